//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections, worker coordination failures and journal errors
//! so clients can bubble them up with consistent context.
use encounter_core::{ErrorCategory, ExecuteError, GameError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine rejected the command; state is unchanged.
    #[error("command rejected: {0}")]
    Rejected(#[from] ExecuteError),

    #[error("sequencer command channel closed")]
    CommandChannelClosed,

    #[error("sequencer reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("sequencer worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    /// Journal failure. For executions this means the command could not be
    /// recorded and its state change was undone.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,
}

impl RuntimeError {
    /// The engine error behind a rejection, if any.
    pub fn rejection(&self) -> Option<&ExecuteError> {
        match self {
            RuntimeError::Rejected(error) => Some(error),
            _ => None,
        }
    }

    /// Caller-facing category; infrastructure failures are `Internal`.
    pub fn category(&self) -> ErrorCategory {
        self.rejection()
            .map_or(ErrorCategory::Internal, GameError::category)
    }
}
