//! Data-driven content definitions and loaders.
//!
//! This crate houses everything an engine needs before its first player
//! command, and provides loaders for the RON/TOML data files that describe it:
//! - Administrative content (abilities, monsters, combos, hunts, quests)
//! - Collaborator rosters (actors with owners, item stats, parties)
//! - Engine configuration and the role directory (TOML)
//!
//! Administrative content reaches the engine only as admin commands, so a
//! catalog loaded here goes through the same validation as live edits.

pub mod catalog;
pub mod roster;
pub mod settings;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::ContentCatalog;
pub use roster::WorldRoster;
pub use settings::{ContentConfig, RoleSettings};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ComboLoader, ConfigLoader, ContentFactory, HuntLoader, LoadResult,
    MonsterLoader, QuestLoader, RosterLoader,
};
