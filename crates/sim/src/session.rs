//! Boots a runtime over a content directory.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use encounter_content::{ContentCatalog, ContentConfig, ContentFactory, WorldRoster};
use encounter_core::Identity;
use encounter_runtime::{
    FileJournal, InMemoryMinter, ManualClock, OracleManager, Runtime, RuntimeConfig,
};

/// Everything loaded from one data directory.
pub struct Content {
    pub config: ContentConfig,
    pub catalog: ContentCatalog,
    pub roster: WorldRoster,
}

impl Content {
    pub fn load(data_dir: &Path) -> Result<Self> {
        let factory = ContentFactory::new(data_dir);
        let config = factory.load_config()?;
        let catalog = factory.load_catalog()?;
        let roster = factory.load_roster()?;
        info!(
            target: "sim::session",
            dir = %data_dir.display(),
            definitions = catalog.len(),
            actors = roster.actors.len(),
            "content loaded"
        );
        Ok(Self {
            config,
            catalog,
            roster,
        })
    }

    /// The identity that installs the catalog.
    pub fn installer(&self) -> Result<Identity> {
        self.config
            .roles
            .admins
            .first()
            .copied()
            .context("config.toml lists no admin to install content")
    }
}

/// A running engine with the catalog installed.
pub struct Session {
    pub runtime: Runtime,
    pub clock: ManualClock,
    pub minter: Arc<InMemoryMinter>,
}

impl Session {
    /// Starts a runtime at time zero and installs every catalog definition.
    pub async fn start(content: Content, journal: Option<&Path>) -> Result<Self> {
        let installer = content.installer()?;
        let clock = ManualClock::starting_at(0);
        let minter = Arc::new(InMemoryMinter::new());

        let mut builder = Runtime::builder()
            .config(RuntimeConfig::from(content.config))
            .oracles(OracleManager::from(content.roster))
            .clock(clock.clone())
            .minter(minter.clone());
        if let Some(path) = journal {
            let journal = FileJournal::create(path)
                .with_context(|| format!("Failed to create journal {}", path.display()))?;
            builder = builder.journal(journal);
        }
        let runtime = builder.build().await?;

        let receipts = runtime
            .handle()
            .install_catalog(installer, &content.catalog)
            .await
            .context("Failed to install content")?;
        info!(
            target: "sim::session",
            installer = %installer,
            commands = receipts.len(),
            "catalog installed"
        );

        Ok(Self {
            runtime,
            clock,
            minter,
        })
    }
}
