//! Hunt commands.

use crate::action::{Access, CommandContext, Transition};
use crate::encounter::{EncounterError, LOOT_ROLL_WORDS, RewardGrant, RewardSource};
use crate::engine::{EngineEvent, Receipt};
use crate::env::Env;
use crate::rng::RandomContext;
use crate::state::{ActorId, EngineState, HuntId};

/// Starts (or restarts) `actor`'s run of a hunt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartHunt {
    pub hunt: HuntId,
    pub actor: ActorId,
}

impl Transition for StartHunt {
    type Error = EncounterError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        let hunt = state.encounters.hunt(self.hunt)?;
        if !hunt.active {
            return Err(EncounterError::HuntInactive(self.hunt));
        }
        if let Some(progress) = state.encounters.progress(self.hunt, self.actor)
            && progress.is_live(hunt, ctx.now)
        {
            return Err(EncounterError::HuntAlreadyActive {
                hunt: self.hunt,
                actor: self.actor,
            });
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
        let deadline = ctx.now + state.encounters.hunt(self.hunt)?.time_limit;
        state.encounters.begin_hunt(self.hunt, self.actor, ctx.now);
        tracing::debug!(hunt = %self.hunt, actor = %self.actor, %deadline, "hunt started");
        receipt.emit(EngineEvent::HuntStarted {
            hunt: self.hunt,
            actor: self.actor,
            deadline,
        });
        Ok(())
    }
}

/// Counts one kill toward a running hunt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordKill {
    pub hunt: HuntId,
    pub actor: ActorId,
}

impl Transition for RecordKill {
    type Error = EncounterError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, ctx: &CommandContext) -> Result<(), Self::Error> {
        let hunt = state.encounters.hunt(self.hunt)?;
        let progress = state
            .encounters
            .progress(self.hunt, self.actor)
            .ok_or(EncounterError::HuntNotStarted {
                hunt: self.hunt,
                actor: self.actor,
            })?;
        progress.ensure_can_record(hunt, ctx.now)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let hunt = state.encounters.hunt(self.hunt)?.clone();
        let loot = state.encounters.monster(hunt.monster)?.loot.clone();
        let record = state
            .encounters
            .progress_mut(self.hunt, self.actor)
            .ok_or(EncounterError::HuntNotStarted {
                hunt: self.hunt,
                actor: self.actor,
            })?
            .record_kill(&hunt);

        receipt.emit(EngineEvent::KillRecorded {
            hunt: self.hunt,
            actor: self.actor,
            kills: record.kills,
        });
        receipt.grant(RewardGrant::Token {
            recipient: self.actor,
            amount: hunt.reward_per_kill,
            source: RewardSource::HuntKill(self.hunt),
        });

        if let Some(loot) = loot {
            let draw = state.rng.draw_or_seed(
                self.actor,
                RandomContext::Loot,
                LOOT_ROLL_WORDS,
                &state.config.world_seed,
            )?;
            if let [chance, pick, ..] = draw.values.as_slice()
                && let Some(item) = loot.roll(chance, pick)
            {
                receipt.grant(RewardGrant::Item {
                    recipient: self.actor,
                    item,
                    source: RewardSource::HuntKill(self.hunt),
                });
            }
        }

        if record.completed {
            tracing::info!(hunt = %self.hunt, actor = %self.actor, kills = record.kills, "hunt completed");
            receipt.emit(EngineEvent::HuntCompleted {
                hunt: self.hunt,
                actor: self.actor,
            });
            receipt.grant(RewardGrant::Token {
                recipient: self.actor,
                amount: hunt.completion_bonus,
                source: RewardSource::HuntCompletion(self.hunt),
            });
        }
        Ok(())
    }
}
