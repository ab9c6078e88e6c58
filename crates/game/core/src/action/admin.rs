//! Content administration commands. All require [`Roles::ADMIN`].
//!
//! Definitions are validated in full during `pre_validate`; `apply` only
//! writes. Monster edits are rejected while an active boss fight references
//! the monster; activation toggles are always allowed.

use crate::ability::{Ability, AbilityError, ComboRule};
use crate::action::{Access, CommandContext, Roles, Transition};
use crate::encounter::{DefensiveMove, Hunt, LootTable, Monster, validate_pool};
use crate::engine::{EngineEvent, Receipt};
use crate::env::Env;
use crate::error::{ErrorCategory, GameError};
use crate::quest::QuestTemplate;
use crate::state::{AbilityId, EngineState, HuntId, MonsterId, QuestId};

/// Kind of administratively managed content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentKind {
    Monster,
    Ability,
    Combo,
    Hunt,
    Quest,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("invalid definition: {0}")]
    InvalidDefinition(&'static str),

    #[error("{kind:?} {id} already exists")]
    DuplicateId { kind: ContentKind, id: u32 },

    #[error("{kind:?} {id} not found")]
    NotFound { kind: ContentKind, id: u32 },

    #[error("{0} is referenced by an active boss fight")]
    MonsterInUse(MonsterId),

    #[error(transparent)]
    Ability(#[from] AbilityError),
}

impl GameError for AdminError {
    fn category(&self) -> ErrorCategory {
        match self {
            AdminError::InvalidDefinition(_) | AdminError::NotFound { .. } => {
                ErrorCategory::Precondition
            }
            AdminError::DuplicateId { .. } | AdminError::MonsterInUse(_) => {
                ErrorCategory::StateConflict
            }
            AdminError::Ability(error) => error.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AdminError::InvalidDefinition(_) => "ADMIN_INVALID_DEFINITION",
            AdminError::DuplicateId { .. } => "ADMIN_DUPLICATE_ID",
            AdminError::NotFound { .. } => "ADMIN_NOT_FOUND",
            AdminError::MonsterInUse(_) => "ADMIN_MONSTER_IN_USE",
            AdminError::Ability(error) => error.error_code(),
        }
    }
}

const ADMIN: Access = Access::Role(Roles::ADMIN);

fn changed(receipt: &mut Receipt, kind: ContentKind, id: u32) {
    let label: &'static str = kind.into();
    tracing::debug!(kind = label, id, "content changed");
    receipt.emit(EngineEvent::ContentChanged { kind, id });
}

fn existing_monster(state: &EngineState, id: MonsterId) -> Result<&Monster, AdminError> {
    state
        .encounters
        .monster(id)
        .map_err(|_| AdminError::NotFound {
            kind: ContentKind::Monster,
            id: id.0,
        })
}

fn editable_monster(state: &EngineState, id: MonsterId) -> Result<&Monster, AdminError> {
    let monster = existing_monster(state, id)?;
    if state.encounters.monster_in_use(id) {
        return Err(AdminError::MonsterInUse(id));
    }
    Ok(monster)
}

fn check_pool_abilities(state: &EngineState, pool: &[DefensiveMove]) -> Result<(), AdminError> {
    validate_pool(pool).map_err(AdminError::InvalidDefinition)?;
    if let Some(missing) = pool
        .iter()
        .find(|entry| state.abilities.get(entry.ability).is_none())
    {
        return Err(AdminError::NotFound {
            kind: ContentKind::Ability,
            id: missing.ability.0,
        });
    }
    Ok(())
}

fn check_monster(state: &EngineState, monster: &Monster) -> Result<(), AdminError> {
    monster.validate().map_err(AdminError::InvalidDefinition)?;
    check_pool_abilities(state, &monster.defensive_pool)
}

// ============================================================================
// Monsters
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateMonster {
    pub monster: Monster,
}

impl Transition for CreateMonster {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        if state.encounters.contains_monster(self.monster.id) {
            return Err(AdminError::DuplicateId {
                kind: ContentKind::Monster,
                id: self.monster.id.0,
            });
        }
        check_monster(state, &self.monster)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.encounters.put_monster(self.monster.clone());
        changed(receipt, ContentKind::Monster, self.monster.id.0);
        Ok(())
    }
}

/// Replaces a monster definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateMonster {
    pub monster: Monster,
}

impl Transition for UpdateMonster {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        editable_monster(state, self.monster.id)?;
        check_monster(state, &self.monster)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.encounters.put_monster(self.monster.clone());
        changed(receipt, ContentKind::Monster, self.monster.id.0);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetMonsterActive {
    pub monster: MonsterId,
    pub active: bool,
}

impl Transition for SetMonsterActive {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        existing_monster(state, self.monster).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let monster = state
            .encounters
            .monster_mut(self.monster)
            .map_err(|_| AdminError::NotFound {
                kind: ContentKind::Monster,
                id: self.monster.0,
            })?;
        monster.active = self.active;
        changed(receipt, ContentKind::Monster, self.monster.0);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetDefensivePool {
    pub monster: MonsterId,
    pub pool: Vec<DefensiveMove>,
}

impl Transition for SetDefensivePool {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        editable_monster(state, self.monster)?;
        check_pool_abilities(state, &self.pool)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let mut monster = editable_monster(state, self.monster)?.clone();
        monster.defensive_pool = self.pool.clone();
        state.encounters.put_monster(monster);
        changed(receipt, ContentKind::Monster, self.monster.0);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetLootTable {
    pub monster: MonsterId,
    pub loot: Option<LootTable>,
}

impl Transition for SetLootTable {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        editable_monster(state, self.monster)?;
        if let Some(loot) = &self.loot {
            loot.validate().map_err(AdminError::InvalidDefinition)?;
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let mut monster = editable_monster(state, self.monster)?.clone();
        monster.loot = self.loot.clone();
        state.encounters.put_monster(monster);
        changed(receipt, ContentKind::Monster, self.monster.0);
        Ok(())
    }
}

// ============================================================================
// Abilities and combos
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateAbility {
    pub ability: Ability,
}

impl Transition for CreateAbility {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        if state.abilities.get(self.ability.id).is_some() {
            return Err(AdminError::DuplicateId {
                kind: ContentKind::Ability,
                id: self.ability.id.0,
            });
        }
        self.ability.validate().map_err(AdminError::InvalidDefinition)?;
        if let Some(missing) = self
            .ability
            .prerequisites
            .iter()
            .find(|prerequisite| state.abilities.get(**prerequisite).is_none())
        {
            return Err(AdminError::NotFound {
                kind: ContentKind::Ability,
                id: missing.0,
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.abilities.insert(self.ability.clone())?;
        changed(receipt, ContentKind::Ability, self.ability.id.0);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetAbilityActive {
    pub ability: AbilityId,
    pub active: bool,
}

impl Transition for SetAbilityActive {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        match state.abilities.get(self.ability) {
            Some(_) => Ok(()),
            None => Err(AdminError::NotFound {
                kind: ContentKind::Ability,
                id: self.ability.0,
            }),
        }
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.abilities.set_active(self.ability, self.active)?;
        changed(receipt, ContentKind::Ability, self.ability.0);
        Ok(())
    }
}

/// Appends a combo rule. Earlier rules take precedence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterCombo {
    pub rule: ComboRule,
}

impl Transition for RegisterCombo {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, _state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        self.rule.validate().map_err(AdminError::InvalidDefinition)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let index = state.combos.register(self.rule.clone())?;
        changed(receipt, ContentKind::Combo, u32::try_from(index).unwrap_or(u32::MAX));
        Ok(())
    }
}

// ============================================================================
// Hunts
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateHunt {
    pub hunt: Hunt,
}

impl Transition for CreateHunt {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        if state.encounters.contains_hunt(self.hunt.id) {
            return Err(AdminError::DuplicateId {
                kind: ContentKind::Hunt,
                id: self.hunt.id.0,
            });
        }
        self.hunt.validate().map_err(AdminError::InvalidDefinition)?;
        existing_monster(state, self.hunt.monster).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.encounters.insert_hunt(self.hunt.clone());
        changed(receipt, ContentKind::Hunt, self.hunt.id.0);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetHuntActive {
    pub hunt: HuntId,
    pub active: bool,
}

impl Transition for SetHuntActive {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let hunt = state
            .encounters
            .hunt_mut(self.hunt)
            .map_err(|_| AdminError::NotFound {
                kind: ContentKind::Hunt,
                id: self.hunt.0,
            })?;
        hunt.active = self.active;
        changed(receipt, ContentKind::Hunt, self.hunt.0);
        Ok(())
    }
}

// ============================================================================
// Quests
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateQuest {
    pub quest: QuestTemplate,
}

impl Transition for CreateQuest {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        if state.quests.contains_template(self.quest.id) {
            return Err(AdminError::DuplicateId {
                kind: ContentKind::Quest,
                id: self.quest.id.0,
            });
        }
        self.quest.validate().map_err(AdminError::InvalidDefinition)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.quests.insert_template(self.quest.clone());
        changed(receipt, ContentKind::Quest, self.quest.id.0);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetQuestActive {
    pub quest: QuestId,
    pub active: bool,
}

impl Transition for SetQuestActive {
    type Error = AdminError;

    fn access(&self) -> Access {
        ADMIN
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let quest = state
            .quests
            .template_mut(self.quest)
            .map_err(|_| AdminError::NotFound {
                kind: ContentKind::Quest,
                id: self.quest.0,
            })?;
        quest.active = self.active;
        changed(receipt, ContentKind::Quest, self.quest.0);
        Ok(())
    }
}
