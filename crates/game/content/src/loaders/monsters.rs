//! Monster catalog loader.

use std::path::Path;

use encounter_core::Monster;

use crate::loaders::{Definition, LoadResult, load_definitions};

impl Definition for Monster {
    const KIND: &'static str = "monster";

    fn id(&self) -> u32 {
        self.id.0
    }

    fn validate(&self) -> Result<(), &'static str> {
        Monster::validate(self)
    }
}

/// Loader for monster definitions, including loot tables and defensive pools.
pub struct MonsterLoader;

impl MonsterLoader {
    /// RON format: `Vec<Monster>`. `required_items`, `defensive_pool` and
    /// `loot` may be omitted.
    pub fn load(path: &Path) -> LoadResult<Vec<Monster>> {
        load_definitions(path)
    }
}
