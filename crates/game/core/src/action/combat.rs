//! Boss fight and ability commands.

use crate::ability::{AbilityError, Element, StatusEffect, TargetRef};
use crate::action::{Access, CommandContext, Transition};
use crate::combat::compute_damage;
use crate::cooldown::CooldownKey;
use crate::encounter::{
    EncounterError, FightPhase, LOOT_ROLL_WORDS, RewardGrant, RewardSource, boss_pool,
    split_by_contribution,
};
use crate::engine::{EngineEvent, Receipt};
use crate::env::Env;
use crate::rng::RandomContext;
use crate::state::{AbilityId, ActorId, EngineState, FightId, MonsterId, Timestamp};

/// Opens a boss fight against `monster` on behalf of `actor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartBossFight {
    pub actor: ActorId,
    pub monster: MonsterId,
    /// Seconds the fight accepts attacks.
    pub duration: u64,
}

impl Transition for StartBossFight {
    type Error = EncounterError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        let monster = state.encounters.monster(self.monster)?;
        if !monster.active {
            return Err(EncounterError::MonsterInactive(self.monster));
        }
        if !monster.boss {
            return Err(EncounterError::NotABoss(self.monster));
        }

        let profile = env.active_actor(self.actor)?;
        if let Some(item) = monster
            .required_items
            .iter()
            .copied()
            .find(|item| !profile.has_equipped(*item))
        {
            return Err(EncounterError::MissingRequiredItem {
                actor: self.actor,
                item,
            });
        }

        if self.duration == 0 {
            return Err(EncounterError::InvalidDuration);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let fight = state.encounters.open_fight(self.monster, ctx.now, self.duration)?;
        tracing::info!(%fight, monster = %self.monster, actor = %self.actor, "boss fight started");
        receipt.emit(EngineEvent::FightStarted {
            fight,
            monster: self.monster,
            opened_by: self.actor,
            ends_at: ctx.now + self.duration,
        });
        Ok(())
    }
}

/// Lands one hit on a boss, optionally casting an ability with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attack {
    pub fight: FightId,
    pub actor: ActorId,
    pub ability: Option<AbilityId>,
}

impl Attack {
    pub fn new(fight: FightId, actor: ActorId) -> Self {
        Self {
            fight,
            actor,
            ability: None,
        }
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = Some(ability);
        self
    }
}

impl Transition for Attack {
    type Error = EncounterError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        let fight = state.encounters.fight(self.fight)?;

        state
            .cooldowns
            .check(self.actor, CooldownKey::Combat, state.config.combat_cooldown, ctx.now)
            .map_err(EncounterError::CombatOnCooldown)?;

        fight.ensure_accepts(self.actor, ctx.now)?;
        state.encounters.monster(fight.monster)?;

        if let Some(ability) = self.ability {
            state
                .casting
                .check_cast(&state.abilities, &state.cooldowns, ability, self.actor, ctx.now)?;
        }

        env.active_actor(self.actor)?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let now = ctx.now;
        let profile = env.active_actor(self.actor)?;
        let weapon = env.equipped_weapon(&profile)?;
        let base = compute_damage(&profile, weapon.as_ref(), &state.config);

        let fight = state.encounters.fight(self.fight)?;
        fight.ensure_accepts(self.actor, now)?;
        let monster = state.encounters.monster(fight.monster)?;
        let (monster_id, monster_element, health) = (monster.id, monster.element, monster.health);

        let cast = match self.ability {
            Some(ability) => Some(state.casting.use_ability(
                &state.abilities,
                &state.combos,
                &mut state.cooldowns,
                ability,
                self.actor,
                TargetRef::Monster(monster_id),
                Some(monster_element),
                now,
            )?),
            None => None,
        };
        let damage = base.saturating_add(cast.map_or(0, |outcome| outcome.damage()));

        let record = state.encounters.fight_mut(self.fight)?.record(self.actor, damage);
        state.cooldowns.stamp(self.actor, CooldownKey::Combat, now);
        state.casting.grant_charge(self.actor);
        let retaliation = retaliate(state, monster_id, self.actor, now)?;

        tracing::debug!(
            fight = %self.fight,
            actor = %self.actor,
            damage,
            cumulative = record.cumulative,
            first_hit = record.first_hit,
            "attack landed"
        );
        receipt.emit(EngineEvent::AttackLanded {
            fight: self.fight,
            actor: self.actor,
            damage,
            cumulative: record.cumulative,
            cast,
            retaliation,
        });

        if record.cumulative >= health {
            settle_defeat(state, self.fight, receipt)?;
        }
        Ok(())
    }

    fn post_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        let fight = state.encounters.fight(self.fight)?;
        if !fight.ledger_is_consistent() {
            return Err(EncounterError::LedgerMismatch { fight: self.fight });
        }
        Ok(())
    }
}

/// Monster answers an attack with one pick from its defensive pool, applied
/// to the attacker as a status effect.
fn retaliate(
    state: &mut EngineState,
    monster: MonsterId,
    actor: ActorId,
    now: Timestamp,
) -> Result<Option<AbilityId>, EncounterError> {
    if state.encounters.monster(monster)?.defensive_pool.is_empty() {
        return Ok(None);
    }
    let draw = state
        .rng
        .draw_or_seed(actor, RandomContext::Combat, 1, &state.config.world_seed)?;
    let Some(word) = draw.values.first() else {
        return Ok(None);
    };
    let Some(picked) = state.encounters.monster(monster)?.pick_defense(word) else {
        return Ok(None);
    };

    match state.abilities.get(picked) {
        Some(ability) if ability.active && ability.duration > 0 => {
            let effect = StatusEffect {
                ability: ability.id,
                category: ability.category,
                started_at: now,
                duration: ability.duration,
                power: ability.power,
            };
            state.casting.apply_status(TargetRef::Actor(actor), effect, now);
            Ok(Some(picked))
        }
        _ => {
            tracing::debug!(%monster, ability = %picked, "retaliation skipped: ability unusable");
            Ok(None)
        }
    }
}

/// Seals a defeated fight, then computes shares and loot.
fn settle_defeat(state: &mut EngineState, fight_id: FightId, receipt: &mut Receipt) -> Result<(), EncounterError> {
    let fight = state.encounters.fight_mut(fight_id)?;
    fight.seal_defeated()?;
    let contributions = fight.contributions();
    let monster_id = fight.monster;

    let monster = state.encounters.monster(monster_id)?;
    let total = boss_pool(
        monster.base_reward,
        contributions.len(),
        state.config.participant_bonus_pct,
    );
    let loot = monster.loot.clone();
    let source = RewardSource::BossFight(fight_id);

    tracing::info!(
        fight = %fight_id,
        monster = %monster_id,
        participants = contributions.len(),
        pool = total,
        "boss defeated"
    );
    receipt.emit(EngineEvent::FightSealed {
        fight: fight_id,
        phase: FightPhase::Defeated,
        pool: total,
    });

    for (recipient, amount) in split_by_contribution(total, &contributions) {
        receipt.grant(RewardGrant::Token {
            recipient,
            amount,
            source,
        });
    }

    if let Some(loot) = loot {
        for (recipient, _) in &contributions {
            let draw = state.rng.draw_or_seed(
                *recipient,
                RandomContext::Loot,
                LOOT_ROLL_WORDS,
                &state.config.world_seed,
            )?;
            let [chance, pick, ..] = draw.values.as_slice() else {
                continue;
            };
            if let Some(item) = loot.roll(chance, pick) {
                receipt.grant(RewardGrant::Item {
                    recipient: *recipient,
                    item,
                    source,
                });
            }
        }
    }
    Ok(())
}

/// Seals a fight whose window has elapsed. No rewards are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpireBossFight {
    pub fight: FightId,
}

impl Transition for ExpireBossFight {
    type Error = EncounterError;

    fn access(&self) -> Access {
        Access::Anyone
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        state.encounters.fight(self.fight)?.ensure_expirable(ctx.now)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        state.encounters.fight_mut(self.fight)?.expire(ctx.now)?;
        tracing::info!(fight = %self.fight, "boss fight expired");
        receipt.emit(EngineEvent::FightSealed {
            fight: self.fight,
            phase: FightPhase::Expired,
            pool: 0,
        });
        Ok(())
    }
}

/// Casts an ability outside of a boss attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseAbility {
    pub caster: ActorId,
    pub ability: AbilityId,
    pub target: TargetRef,
}

impl UseAbility {
    /// Element of the target. Actors have none.
    fn target_element(&self, state: &EngineState, env: &Env<'_>) -> Result<Option<Element>, AbilityError> {
        match self.target {
            TargetRef::Monster(id) => state
                .encounters
                .monster(id)
                .map(|monster| Some(monster.element))
                .map_err(|_| AbilityError::TargetNotFound(self.target)),
            TargetRef::Actor(id) => match env.actors()?.actor(id) {
                Some(_) => Ok(None),
                None => Err(AbilityError::TargetNotFound(self.target)),
            },
        }
    }
}

impl Transition for UseAbility {
    type Error = AbilityError;

    fn access(&self) -> Access {
        Access::Owner(self.caster)
    }

    fn pre_validate(&self, state: &EngineState, env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        state
            .casting
            .check_cast(&state.abilities, &state.cooldowns, self.ability, self.caster, ctx.now)?;
        self.target_element(state, env).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut EngineState,
        env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let element = self.target_element(state, env)?;
        let outcome = state.casting.use_ability(
            &state.abilities,
            &state.combos,
            &mut state.cooldowns,
            self.ability,
            self.caster,
            self.target,
            element,
            ctx.now,
        )?;
        receipt.emit(EngineEvent::AbilityUsed {
            caster: self.caster,
            target: self.target,
            outcome,
        });
        Ok(())
    }
}
