//! Hunt and quest template loaders.

use std::path::Path;

use encounter_core::{Hunt, QuestTemplate};

use crate::loaders::{Definition, LoadResult, load_definitions};

impl Definition for Hunt {
    const KIND: &'static str = "hunt";

    fn id(&self) -> u32 {
        self.id.0
    }

    fn validate(&self) -> Result<(), &'static str> {
        Hunt::validate(self)
    }
}

impl Definition for QuestTemplate {
    const KIND: &'static str = "quest";

    fn id(&self) -> u32 {
        self.id.0
    }

    fn validate(&self) -> Result<(), &'static str> {
        QuestTemplate::validate(self)
    }
}

pub struct HuntLoader;

impl HuntLoader {
    /// RON format: `Vec<Hunt>`.
    pub fn load(path: &Path) -> LoadResult<Vec<Hunt>> {
        load_definitions(path)
    }
}

pub struct QuestLoader;

impl QuestLoader {
    /// RON format: `Vec<QuestTemplate>`. `min_stats` may be omitted.
    pub fn load(path: &Path) -> LoadResult<Vec<QuestTemplate>> {
        load_definitions(path)
    }
}
