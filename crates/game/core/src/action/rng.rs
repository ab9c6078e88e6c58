//! Random stream commands.

use crate::action::{Access, CommandContext, Transition};
use crate::engine::{EngineEvent, Receipt};
use crate::env::Env;
use crate::rng::{RandomContext, RngError, Seed};
use crate::state::{ActorId, EngineState};

/// Opens `actor`'s stream for `context` with an explicit seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitializeSeed {
    pub actor: ActorId,
    pub context: RandomContext,
    pub seed: Seed,
}

impl Transition for InitializeSeed {
    type Error = RngError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn pre_validate(&self, state: &EngineState, _env: &Env<'_>, _ctx: &CommandContext) -> Result<(), Self::Error> {
        if state.rng.is_initialized(self.actor, self.context) {
            return Err(RngError::AlreadyInitialized {
                actor: self.actor,
                context: self.context,
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
        state
            .rng
            .initialize_seed(self.actor, self.context, self.seed)?;
        receipt.emit(EngineEvent::SeedInitialized {
            actor: self.actor,
            context: self.context,
        });
        Ok(())
    }
}

/// Draws `count` values from an initialized stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawRandom {
    pub actor: ActorId,
    pub context: RandomContext,
    pub count: u32,
}

impl Transition for DrawRandom {
    type Error = RngError;

    fn access(&self) -> Access {
        Access::Owner(self.actor)
    }

    fn apply(
        &self,
        state: &mut EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error> {
        let draw = state.rng.draw(self.actor, self.context, self.count)?;
        receipt.emit(EngineEvent::RandomDrawn {
            actor: self.actor,
            context: self.context,
            draw,
        });
        Ok(())
    }
}
