//! Content loaders for reading game data from files.
//!
//! Definition files are RON lists of core types; `config.toml` holds engine
//! tuning and the role directory. Every loader validates what it reads so a
//! bad file fails at load time, not halfway through installation.

pub mod abilities;
pub mod config;
pub mod factory;
pub mod monsters;
pub mod progression;
pub mod roster;

pub use abilities::{AbilityLoader, ComboLoader};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use monsters::MonsterLoader;
pub use progression::{HuntLoader, QuestLoader};
pub use roster::RosterLoader;

use std::collections::BTreeSet;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses a RON file.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON {}: {}", what, path.display(), e))
}

/// A definition with an id and self-contained validation.
pub(crate) trait Definition {
    const KIND: &'static str;

    fn id(&self) -> u32;

    fn validate(&self) -> Result<(), &'static str>;
}

/// Loads a RON list of definitions, validating each and rejecting repeated ids.
pub(crate) fn load_definitions<T>(path: &Path) -> LoadResult<Vec<T>>
where
    T: Definition + DeserializeOwned,
{
    let definitions: Vec<T> = read_ron(path, T::KIND)?;

    let mut seen = BTreeSet::new();
    for definition in &definitions {
        let id = definition.id();
        definition
            .validate()
            .map_err(|reason| anyhow::anyhow!("Invalid {} {}: {}", T::KIND, id, reason))?;
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id {} in {}", T::KIND, id, path.display());
        }
    }

    Ok(definitions)
}
