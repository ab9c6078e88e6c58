//! Oracle access errors.

use crate::error::{ErrorCategory, GameError};
use crate::state::{ActorId, ItemId, PartyId};

/// Errors that occur when accessing collaborator data.
///
/// Missing oracles are deployment mistakes; missing records are ordinary
/// precondition failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("ActorOracle not available")]
    ActorsNotAvailable,

    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    #[error("PartyOracle not available")]
    PartiesNotAvailable,

    #[error("{0} not found")]
    ActorNotFound(ActorId),

    #[error("{0} is inactive")]
    ActorInactive(ActorId),

    #[error("{0} has no registered owner")]
    OwnerNotFound(ActorId),

    #[error("{0} not found")]
    ItemNotFound(ItemId),

    #[error("{0} not found")]
    PartyNotFound(PartyId),
}

impl GameError for OracleError {
    fn category(&self) -> ErrorCategory {
        use OracleError::*;
        match self {
            ActorsNotAvailable | ItemsNotAvailable | PartiesNotAvailable => {
                ErrorCategory::Internal
            }
            ActorNotFound(_) | ActorInactive(_) | OwnerNotFound(_) | ItemNotFound(_)
            | PartyNotFound(_) => ErrorCategory::Precondition,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ActorsNotAvailable => "ORACLE_ACTORS_NOT_AVAILABLE",
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            PartiesNotAvailable => "ORACLE_PARTIES_NOT_AVAILABLE",
            ActorNotFound(_) => "ORACLE_ACTOR_NOT_FOUND",
            ActorInactive(_) => "ORACLE_ACTOR_INACTIVE",
            OwnerNotFound(_) => "ORACLE_OWNER_NOT_FOUND",
            ItemNotFound(_) => "ORACLE_ITEM_NOT_FOUND",
            PartyNotFound(_) => "ORACLE_PARTY_NOT_FOUND",
        }
    }
}
