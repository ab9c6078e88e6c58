//! Command execution pipeline.
//!
//! The [`Engine`] is the authoritative reducer for [`EngineState`]. It checks
//! authorization, drives the transition phases and surfaces rich error
//! information for the runtime. Every command is atomic: if any phase fails
//! the state is restored to its pre-command snapshot.

mod errors;
mod receipt;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};
pub use receipt::{EngineEvent, Receipt};

use crate::action::{Access, Command, CommandContext};
use crate::env::Env;
use crate::state::EngineState;

/// Engine that executes commands against borrowed state.
pub struct Engine<'a> {
    state: &'a mut EngineState,
}

impl<'a> Engine<'a> {
    pub fn new(state: &'a mut EngineState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &EngineState {
        self.state
    }

    /// Executes a command and returns its receipt.
    ///
    /// Grants in the receipt are owed only once this call returns `Ok`; on
    /// error the state is exactly as it was before the call.
    pub fn execute(
        &mut self,
        env: Env<'_>,
        ctx: &CommandContext,
        command: &Command,
    ) -> Result<Receipt, ExecuteError> {
        authorize(&env, ctx, command.access())?;

        let snapshot = self.state.clone();
        let mut receipt = Receipt::new(self.state.nonce(), ctx.now);

        match transition::execute_transition(command, self.state, &env, ctx, &mut receipt) {
            Ok(()) => {
                self.state.advance_nonce();
                tracing::debug!(
                    command = command.name(),
                    nonce = receipt.nonce,
                    events = receipt.events.len(),
                    grants = receipt.grants.len(),
                    "command committed"
                );
                Ok(receipt)
            }
            Err(error) => {
                *self.state = snapshot;
                tracing::debug!(command = command.name(), %error, "command rolled back");
                Err(error)
            }
        }
    }
}

/// Checks the caller against a command's access requirement.
fn authorize(env: &Env<'_>, ctx: &CommandContext, access: Access) -> Result<(), ExecuteError> {
    let caller = ctx.caller;
    match access {
        Access::Anyone => Ok(()),
        Access::Role(required) if caller.roles.contains(required) => Ok(()),
        Access::Role(required) => Err(ExecuteError::Unauthorized {
            caller: caller.identity,
            required,
        }),
        Access::Owner(actor) => {
            let owner = env.owner_of(actor).map_err(ExecuteError::Ownership)?;
            if owner != caller.identity {
                return Err(ExecuteError::NotOwner {
                    caller: caller.identity,
                    actor,
                });
            }
            Ok(())
        }
    }
}
