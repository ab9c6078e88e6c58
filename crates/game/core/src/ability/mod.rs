//! Abilities, elemental effectiveness, status effects and combos.
//!
//! [`AbilityBook`] holds the administratively defined abilities.
//! [`AbilityState`] holds everything casting changes: status effects on
//! targets, charge meters, the prerequisite ledger and combo histories.
//! [`AbilityState::use_ability`] validates a cast in full before mutating, so
//! a rejected cast leaves no trace.

mod combo;
mod element;
mod status;

pub use combo::{Cast, ComboBook, ComboHistory, ComboRule};
pub use element::{Element, Multiplier, effectiveness, effectiveness_against};
pub use status::{StatusEffect, StatusEffects, TargetRef};

use std::collections::{BTreeMap, BTreeSet};

use crate::cooldown::{CooldownError, CooldownGovernor, CooldownKey};
use crate::env::OracleError;
use crate::error::{ErrorCategory, GameError};
use crate::state::{AbilityId, ActorId, Timestamp};

/// What an ability does when it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityCategory {
    Damage,
    DamageOverTime,
    Buff,
    Debuff,
    Heal,
    Shield,
    Special,
}

impl AbilityCategory {
    /// Categories whose effect adds to attack damage.
    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Damage | Self::DamageOverTime | Self::Special)
    }

    /// Categories that leave a timed status effect on the target.
    pub const fn leaves_status(self) -> bool {
        matches!(
            self,
            Self::DamageOverTime | Self::Buff | Self::Debuff | Self::Shield
        )
    }
}

/// Ability definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub category: AbilityCategory,
    pub element: Element,
    pub power: u64,
    /// Seconds the applied status effect lasts.
    pub duration: u64,
    /// Seconds before the caster may cast this element again.
    pub cooldown: u64,
    pub area: bool,
    /// Charges consumed per cast.
    pub charge_required: u32,
    /// Abilities the caster must have cast before.
    pub prerequisites: Vec<AbilityId>,
    pub active: bool,
}

impl Ability {
    /// Checks the definition, returning the first violated rule.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("ability name is empty");
        }
        if self.prerequisites.contains(&self.id) {
            return Err("ability lists itself as prerequisite");
        }
        if self.category.leaves_status() && self.duration == 0 {
            return Err("status ability needs a duration");
        }
        Ok(())
    }
}

/// Registry of ability definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityBook {
    abilities: BTreeMap<AbilityId, Ability>,
}

impl AbilityBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(&id)
    }

    pub fn insert(&mut self, ability: Ability) -> Result<(), AbilityError> {
        ability.validate().map_err(AbilityError::InvalidDefinition)?;
        if self.abilities.contains_key(&ability.id) {
            return Err(AbilityError::DuplicateAbility(ability.id));
        }
        self.abilities.insert(ability.id, ability);
        Ok(())
    }

    pub fn set_active(&mut self, id: AbilityId, active: bool) -> Result<(), AbilityError> {
        let ability = self
            .abilities
            .get_mut(&id)
            .ok_or(AbilityError::AbilityNotFound(id))?;
        ability.active = active;
        Ok(())
    }

    /// Returns an ability that exists and is active.
    pub fn usable(&self, id: AbilityId) -> Result<&Ability, AbilityError> {
        let ability = self.get(id).ok_or(AbilityError::AbilityNotFound(id))?;
        if !ability.active {
            return Err(AbilityError::AbilityInactive(id));
        }
        Ok(ability)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }
}

/// Errors raised while defining or casting abilities.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("{0} not found")]
    AbilityNotFound(AbilityId),

    #[error("{0} is inactive")]
    AbilityInactive(AbilityId),

    #[error("{0} already exists")]
    DuplicateAbility(AbilityId),

    #[error(transparent)]
    OnCooldown(#[from] CooldownError),

    #[error("{ability} requires {missing} to have been cast first")]
    PrerequisiteNotMet {
        ability: AbilityId,
        missing: AbilityId,
    },

    #[error("{ability} needs {required} charges, caster has {available}")]
    InsufficientCharge {
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("combo needs at least two elements, got {len}")]
    ComboTooShort { len: usize },

    #[error("combo has {len} elements, limit is {max}", max = crate::config::EngineConfig::MAX_COMBO_LENGTH)]
    ComboTooLong { len: usize },

    #[error("invalid ability definition: {0}")]
    InvalidDefinition(&'static str),

    #[error("target {0:?} not found")]
    TargetNotFound(TargetRef),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for AbilityError {
    fn category(&self) -> ErrorCategory {
        use AbilityError::*;
        match self {
            AbilityNotFound(_) | AbilityInactive(_) | PrerequisiteNotMet { .. } => {
                ErrorCategory::Precondition
            }
            InsufficientCharge { .. } => ErrorCategory::Precondition,
            OnCooldown(_) => ErrorCategory::Timing,
            DuplicateAbility(_) => ErrorCategory::StateConflict,
            ComboTooShort { .. } | ComboTooLong { .. } | InvalidDefinition(_) => {
                ErrorCategory::Precondition
            }
            TargetNotFound(_) => ErrorCategory::Precondition,
            Oracle(error) => error.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        use AbilityError::*;
        match self {
            AbilityNotFound(_) => "ABILITY_NOT_FOUND",
            AbilityInactive(_) => "ABILITY_INACTIVE",
            DuplicateAbility(_) => "ABILITY_DUPLICATE",
            OnCooldown(_) => "ABILITY_ON_COOLDOWN",
            PrerequisiteNotMet { .. } => "ABILITY_PREREQUISITE_NOT_MET",
            InsufficientCharge { .. } => "ABILITY_INSUFFICIENT_CHARGE",
            ComboTooShort { .. } => "ABILITY_COMBO_TOO_SHORT",
            ComboTooLong { .. } => "ABILITY_COMBO_TOO_LONG",
            InvalidDefinition(_) => "ABILITY_INVALID_DEFINITION",
            TargetNotFound(_) => "ABILITY_TARGET_NOT_FOUND",
            Oracle(error) => error.error_code(),
        }
    }
}

/// Result of a resolved cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityOutcome {
    pub ability: AbilityId,
    pub category: AbilityCategory,
    pub element: Element,
    /// Power after elemental effectiveness, before caster modifiers.
    pub base_effect: u64,
    /// Final effect after status scaling and combo bonus.
    pub effect: u64,
    /// Bonus of the combo completed by this cast, if any.
    pub combo: Option<Multiplier>,
    pub status_applied: bool,
}

impl AbilityOutcome {
    /// Portion of the effect that adds to attack damage.
    pub fn damage(&self) -> u64 {
        if self.category.deals_damage() {
            self.effect
        } else {
            0
        }
    }
}

/// Mutable casting state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityState {
    effects: BTreeMap<TargetRef, StatusEffects>,
    charges: BTreeMap<ActorId, u32>,
    cast_ledger: BTreeSet<(ActorId, AbilityId)>,
    histories: BTreeMap<ActorId, ComboHistory>,
}

impl AbilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects_on(&self, target: TargetRef) -> Option<&StatusEffects> {
        self.effects.get(&target)
    }

    pub fn charges(&self, actor: ActorId) -> u32 {
        self.charges.get(&actor).copied().unwrap_or(0)
    }

    pub fn grant_charge(&mut self, actor: ActorId) {
        let entry = self.charges.entry(actor).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    pub fn has_cast(&self, actor: ActorId, ability: AbilityId) -> bool {
        self.cast_ledger.contains(&(actor, ability))
    }

    pub fn history(&self, actor: ActorId) -> Option<&ComboHistory> {
        self.histories.get(&actor)
    }

    /// Applies a status effect to a target.
    pub fn apply_status(&mut self, target: TargetRef, effect: StatusEffect, now: Timestamp) {
        self.effects.entry(target).or_default().add(effect, now);
    }

    /// Net buff/debuff scaling of `value` for a caster.
    pub fn scale_for(&self, caster: ActorId, value: u64, now: Timestamp) -> u64 {
        self.effects_on(TargetRef::Actor(caster))
            .map_or(value, |effects| effects.scale(value, now))
    }

    /// Read-only validation of a cast.
    pub fn check_cast<'b>(
        &self,
        book: &'b AbilityBook,
        cooldowns: &CooldownGovernor,
        ability: AbilityId,
        caster: ActorId,
        now: Timestamp,
    ) -> Result<&'b Ability, AbilityError> {
        let definition = book.usable(ability)?;

        cooldowns.check(
            caster,
            CooldownKey::Element(definition.element),
            definition.cooldown,
            now,
        )?;

        if let Some(missing) = definition
            .prerequisites
            .iter()
            .copied()
            .find(|prerequisite| !self.has_cast(caster, *prerequisite))
        {
            return Err(AbilityError::PrerequisiteNotMet { ability, missing });
        }

        let available = self.charges(caster);
        if available < definition.charge_required {
            return Err(AbilityError::InsufficientCharge {
                ability,
                required: definition.charge_required,
                available,
            });
        }

        Ok(definition)
    }

    /// Casts an ability at a target.
    ///
    /// `target_element` is the target's element, `None` for targets without
    /// one. Validation happens before any mutation.
    #[allow(clippy::too_many_arguments)]
    pub fn use_ability(
        &mut self,
        book: &AbilityBook,
        combos: &ComboBook,
        cooldowns: &mut CooldownGovernor,
        ability: AbilityId,
        caster: ActorId,
        target: TargetRef,
        target_element: Option<Element>,
        now: Timestamp,
    ) -> Result<AbilityOutcome, AbilityError> {
        let definition = self.check_cast(book, cooldowns, ability, caster, now)?;

        let base_effect = effectiveness_against(definition.element, target_element).apply(definition.power);
        let mut effect = self.scale_for(caster, base_effect, now);

        let history = self.histories.entry(caster).or_default();
        history.record(definition.element, now);
        let combo = combos.detect(history, now).map(|rule| rule.bonus);
        if let Some(bonus) = combo {
            effect = bonus.apply(effect);
        }

        let status_applied = definition.category.leaves_status();
        if status_applied {
            self.apply_status(
                target,
                StatusEffect {
                    ability,
                    category: definition.category,
                    started_at: now,
                    duration: definition.duration,
                    power: definition.power,
                },
                now,
            );
        }

        if definition.charge_required > 0 {
            let charges = self.charges.entry(caster).or_insert(0);
            *charges -= definition.charge_required;
        }
        self.cast_ledger.insert((caster, ability));
        cooldowns.stamp(caster, CooldownKey::Element(definition.element), now);

        tracing::debug!(
            %caster,
            %ability,
            base_effect,
            effect,
            combo = ?combo,
            "ability resolved"
        );

        Ok(AbilityOutcome {
            ability,
            category: definition.category,
            element: definition.element,
            base_effect,
            effect,
            combo,
            status_applied,
        })
    }

    /// Matches a claimed cast sequence for `actor` against the combo rules.
    pub fn check_combo(
        &self,
        combos: &ComboBook,
        actor: ActorId,
        sequence: &[Element],
        now: Timestamp,
    ) -> Result<Multiplier, AbilityError> {
        combos.check(self.history(actor), sequence, now)
    }
}
