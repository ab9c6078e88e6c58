//! Actor lookups provided by the character collaborator.
//!
//! Actors are owned outside the engine. The engine only reads their stats,
//! equipment and ownership through [`ActorOracle`].

use crate::state::{ActorId, Affinity, CoreStats, Identity, ItemId};

/// Read-only access to character data and ownership.
pub trait ActorOracle: Send + Sync {
    /// Returns the actor's current profile, or `None` if it does not exist.
    fn actor(&self, id: ActorId) -> Option<ActorProfile>;

    /// Returns the identity that owns the actor.
    fn owner_of(&self, id: ActorId) -> Option<Identity>;
}

/// Snapshot of a character as seen by the rules engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorProfile {
    pub id: ActorId,
    pub level: u32,
    pub stats: CoreStats,
    pub alignment: Affinity,
    /// Equipped items in slot order.
    pub equipped: Vec<ItemId>,
    pub active: bool,
}

impl ActorProfile {
    pub fn new(id: ActorId, level: u32, stats: CoreStats, alignment: Affinity) -> Self {
        Self {
            id,
            level,
            stats,
            alignment,
            equipped: Vec::new(),
            active: true,
        }
    }

    /// Adds an equipped item (builder pattern).
    #[must_use]
    pub fn with_item(mut self, item: ItemId) -> Self {
        self.equipped.push(item);
        self
    }

    /// Returns true if `item` is currently equipped.
    pub fn has_equipped(&self, item: ItemId) -> bool {
        self.equipped.contains(&item)
    }
}
