//! Command transition dispatch and execution logic.

use crate::action::{Command, CommandContext, Transition};
use crate::env::Env;
use crate::state::EngineState;

use super::Receipt;
use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the engine state and record events and grants
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut EngineState,
    env: &Env<'_>,
    ctx: &CommandContext,
    receipt: &mut Receipt,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: Transition,
{
    transition
        .pre_validate(state, env, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, env, ctx, receipt)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env, ctx)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes a command to its transition.
///
/// This is the internal implementation used by `Engine::execute()`.
pub(super) fn execute_transition(
    command: &Command,
    state: &mut EngineState,
    env: &Env<'_>,
    ctx: &CommandContext,
    receipt: &mut Receipt,
) -> Result<(), ExecuteError> {
    match command {
        Command::CreateMonster(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::UpdateMonster(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetMonsterActive(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetDefensivePool(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetLootTable(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::CreateAbility(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetAbilityActive(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::RegisterCombo(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::CreateHunt(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetHuntActive(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::CreateQuest(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),
        Command::SetQuestActive(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Admin),

        Command::StartBossFight(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Encounter),
        Command::Attack(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Encounter),
        Command::ExpireBossFight(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Encounter),
        Command::StartHunt(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Encounter),
        Command::RecordKill(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Encounter),

        Command::UseAbility(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Ability),

        Command::StartQuest(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Quest),
        Command::CompleteQuest(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Quest),
        Command::UpdateQuestProgress(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Quest),

        Command::InitializeSeed(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Rng),
        Command::DrawRandom(t) => drive_transition(t, state, env, ctx, receipt).map_err(ExecuteError::Rng),
    }
}
