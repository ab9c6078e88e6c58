//! Engine configuration and role directory loader.

use std::path::Path;

use encounter_core::EngineConfig;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};
use crate::settings::{ContentConfig, RoleSettings};

/// On-disk shape of `config.toml`.
///
/// ```toml
/// world_seed = "<64 hex chars>"   # optional
///
/// [engine]
/// combat_cooldown = 30
///
/// [roles]
/// admins = [1]
/// validators = [2]
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    world_seed: Option<String>,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    roles: RoleSettings,
}

/// Loader for deployment settings from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a TOML file.
    ///
    /// A hex `world_seed` at the top level overrides `engine.world_seed`.
    pub fn load(path: &Path) -> LoadResult<ContentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentConfig> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let mut engine = file.engine;
        if let Some(seed) = file.world_seed {
            engine = engine.with_world_seed(parse_seed(&seed)?);
        }

        Ok(ContentConfig {
            engine,
            roles: file.roles,
        })
    }
}

fn parse_seed(text: &str) -> LoadResult<[u8; 32]> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| anyhow::anyhow!("Invalid world_seed hex: {}", e))?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow::anyhow!("world_seed must be 32 bytes, got {}", bytes.len()))
}
