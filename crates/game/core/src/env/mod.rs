//! Traits describing read-only collaborator data.
//!
//! Oracles expose character profiles, item stats and party rosters. The
//! [`Env`] aggregate bundles them so the engine can access everything it needs
//! without hard coupling to concrete implementations.
mod actors;
mod error;
mod items;
mod party;
mod snapshot;

pub use actors::{ActorOracle, ActorProfile};
pub use error::OracleError;
pub use items::{ItemOracle, ItemStats};
pub use party::{PartyOracle, PartyRoster};
pub use snapshot::{OracleSnapshot, OwnedActor};

use crate::state::{ActorId, Identity, PartyId};

/// Aggregates read-only oracles required by the transition pipeline.
#[derive(Clone, Copy, Default)]
pub struct Env<'a> {
    actors: Option<&'a dyn ActorOracle>,
    items: Option<&'a dyn ItemOracle>,
    parties: Option<&'a dyn PartyOracle>,
}

impl<'a> Env<'a> {
    pub fn new(
        actors: Option<&'a dyn ActorOracle>,
        items: Option<&'a dyn ItemOracle>,
        parties: Option<&'a dyn PartyOracle>,
    ) -> Self {
        Self {
            actors,
            items,
            parties,
        }
    }

    pub fn with_all(
        actors: &'a dyn ActorOracle,
        items: &'a dyn ItemOracle,
        parties: &'a dyn PartyOracle,
    ) -> Self {
        Self::new(Some(actors), Some(items), Some(parties))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the ActorOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ActorsNotAvailable` if no actor oracle was provided.
    pub fn actors(&self) -> Result<&'a dyn ActorOracle, OracleError> {
        self.actors.ok_or(OracleError::ActorsNotAvailable)
    }

    /// Returns the ItemOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a dyn ItemOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the PartyOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::PartiesNotAvailable` if no party oracle was provided.
    pub fn parties(&self) -> Result<&'a dyn PartyOracle, OracleError> {
        self.parties.ok_or(OracleError::PartiesNotAvailable)
    }

    /// Looks up an actor that exists and is active.
    pub fn active_actor(&self, id: ActorId) -> Result<ActorProfile, OracleError> {
        let profile = self
            .actors()?
            .actor(id)
            .ok_or(OracleError::ActorNotFound(id))?;
        if !profile.active {
            return Err(OracleError::ActorInactive(id));
        }
        Ok(profile)
    }

    pub fn owner_of(&self, id: ActorId) -> Result<Identity, OracleError> {
        self.actors()?
            .owner_of(id)
            .ok_or(OracleError::OwnerNotFound(id))
    }

    pub fn party(&self, id: PartyId) -> Result<PartyRoster, OracleError> {
        self.parties()?
            .party(id)
            .ok_or(OracleError::PartyNotFound(id))
    }

    /// Resolves the first equipped, active, weapon-like item of an actor.
    ///
    /// Unknown item ids are skipped; the item collaborator is the authority on
    /// what exists.
    pub fn equipped_weapon(&self, profile: &ActorProfile) -> Result<Option<ItemStats>, OracleError> {
        let items = self.items()?;
        Ok(profile
            .equipped
            .iter()
            .filter_map(|id| items.item_stats(*id))
            .find(ItemStats::is_weapon))
    }
}
