pub mod common;
pub mod profile;

// Re-export identifiers and time
pub use common::{
    AbilityId, ActorId, FightId, HuntId, Identity, ItemId, MonsterId, PartyId, QuestId, Timestamp,
};

// Re-export actor-facing value types
pub use profile::{Affinity, CoreStats};
