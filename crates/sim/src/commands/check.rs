//! Validates a content directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::script;
use crate::session::{Content, Session};

/// Validate a content directory by installing it into a scratch engine
#[derive(Parser)]
pub struct Check {
    /// Content directory
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Also parse this script
    #[arg(long)]
    script: Option<PathBuf>,
}

impl Check {
    pub async fn execute(self) -> Result<()> {
        let content = Content::load(&self.data)?;
        let definitions = content.catalog.len();
        let actors = content.roster.actors.len();

        let session = Session::start(content, None).await?;
        session.runtime.shutdown().await?;

        if let Some(path) = &self.script {
            let steps = script::load(path)?;
            println!("script {}: {} steps", path.display(), steps.len());
        }

        println!(
            "{}: {definitions} definitions installed, {actors} actors",
            self.data.display()
        );
        Ok(())
    }
}
