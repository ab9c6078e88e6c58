//! Error types for the command execution pipeline.

use crate::action::{AdminError, Roles};
use crate::ability::AbilityError;
use crate::encounter::EncounterError;
use crate::env::OracleError;
use crate::error::{ErrorCategory, GameError};
use crate::quest::QuestError;
use crate::rng::RngError;
use crate::state::{ActorId, Identity};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing a command through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("caller {caller} lacks role {required:?}")]
    Unauthorized { caller: Identity, required: Roles },

    #[error("caller {caller} does not own {actor}")]
    NotOwner { caller: Identity, actor: ActorId },

    #[error("ownership lookup failed: {0}")]
    Ownership(OracleError),

    #[error("admin command failed: {0}")]
    Admin(TransitionPhaseError<AdminError>),

    #[error("encounter command failed: {0}")]
    Encounter(TransitionPhaseError<EncounterError>),

    #[error("ability command failed: {0}")]
    Ability(TransitionPhaseError<AbilityError>),

    #[error("quest command failed: {0}")]
    Quest(TransitionPhaseError<QuestError>),

    #[error("random stream command failed: {0}")]
    Rng(TransitionPhaseError<RngError>),
}

impl ExecuteError {
    /// Phase the command failed in; `None` for authorization failures.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            ExecuteError::Unauthorized { .. }
            | ExecuteError::NotOwner { .. }
            | ExecuteError::Ownership(_) => None,
            ExecuteError::Admin(e) => Some(e.phase),
            ExecuteError::Encounter(e) => Some(e.phase),
            ExecuteError::Ability(e) => Some(e.phase),
            ExecuteError::Quest(e) => Some(e.phase),
            ExecuteError::Rng(e) => Some(e.phase),
        }
    }

    fn inner(&self) -> Option<&dyn GameError> {
        match self {
            ExecuteError::Unauthorized { .. } | ExecuteError::NotOwner { .. } => None,
            ExecuteError::Ownership(e) => Some(e),
            ExecuteError::Admin(e) => Some(&e.error),
            ExecuteError::Encounter(e) => Some(&e.error),
            ExecuteError::Ability(e) => Some(&e.error),
            ExecuteError::Quest(e) => Some(&e.error),
            ExecuteError::Rng(e) => Some(&e.error),
        }
    }
}

impl GameError for ExecuteError {
    fn category(&self) -> ErrorCategory {
        self.inner()
            .map_or(ErrorCategory::Authorization, |error| error.category())
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Unauthorized { .. } => "UNAUTHORIZED",
            ExecuteError::NotOwner { .. } => "NOT_OWNER",
            other => other.inner().map_or("UNKNOWN", |error| error.error_code()),
        }
    }
}
