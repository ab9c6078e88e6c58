//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use encounter_core::{Ability, ComboRule, Hunt, Monster, QuestTemplate};

use crate::catalog::ContentCatalog;
use crate::loaders::{
    AbilityLoader, ComboLoader, ConfigLoader, HuntLoader, LoadResult, MonsterLoader, QuestLoader,
    RosterLoader,
};
use crate::roster::WorldRoster;
use crate::settings::ContentConfig;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── abilities.ron
/// ├── monsters.ron
/// ├── combos.ron
/// ├── hunts.ron
/// ├── quests.ron
/// ├── actors.ron
/// ├── items.ron
/// └── parties.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration and roles from `config.toml`.
    pub fn load_config(&self) -> LoadResult<ContentConfig> {
        ConfigLoader::load(&self.path("config.toml"))
    }

    pub fn load_abilities(&self) -> LoadResult<Vec<Ability>> {
        AbilityLoader::load(&self.path("abilities.ron"))
    }

    pub fn load_monsters(&self) -> LoadResult<Vec<Monster>> {
        MonsterLoader::load(&self.path("monsters.ron"))
    }

    pub fn load_combos(&self) -> LoadResult<Vec<ComboRule>> {
        ComboLoader::load(&self.path("combos.ron"))
    }

    pub fn load_hunts(&self) -> LoadResult<Vec<Hunt>> {
        HuntLoader::load(&self.path("hunts.ron"))
    }

    pub fn load_quests(&self) -> LoadResult<Vec<QuestTemplate>> {
        QuestLoader::load(&self.path("quests.ron"))
    }

    /// Load every administrative definition.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        Ok(ContentCatalog {
            abilities: self.load_abilities()?,
            monsters: self.load_monsters()?,
            combos: self.load_combos()?,
            hunts: self.load_hunts()?,
            quests: self.load_quests()?,
        })
    }

    /// Load collaborator data from `actors.ron`, `items.ron` and `parties.ron`.
    pub fn load_roster(&self) -> LoadResult<WorldRoster> {
        RosterLoader::load(
            &self.path("actors.ron"),
            &self.path("items.ron"),
            &self.path("parties.ron"),
        )
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
