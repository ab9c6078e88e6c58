//! Scripted sessions.
//!
//! A script is a RON list of steps, each a command submitted by an identity
//! at a given second:
//!
//! ```ron
//! [
//!     (at: 100, caller: 10, command: StartBossFight((actor: 1, monster: 1, duration: 600))),
//!     (at: 110, caller: 10, command: Attack((fight: 1, actor: 1, ability: None))),
//! ]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use encounter_core::{Command, Identity};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    pub at: u64,
    pub caller: Identity,
    pub command: Command,
    /// Marks a step the author expects to be rejected.
    #[serde(default)]
    pub expect_rejection: bool,
}

pub fn load(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn parse(content: &str) -> Result<Vec<ScriptStep>> {
    let steps: Vec<ScriptStep> = ron::from_str(content)?;
    if let Some(pair) = steps.windows(2).find(|pair| pair[1].at < pair[0].at) {
        anyhow::bail!(
            "steps must not go back in time ({} after {})",
            pair[1].at,
            pair[0].at
        );
    }
    Ok(steps)
}
