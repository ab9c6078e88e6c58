//! Replays a scripted session against a content directory.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use encounter_core::{GameError, Identity, Receipt};
use encounter_runtime::{JournalEntry, RuntimeError};

use crate::script::{self, ScriptStep};
use crate::session::{Content, Session};

/// Replay a script and print what happened
#[derive(Parser)]
pub struct Run {
    /// Content directory
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Script to replay. Defaults to `scenario.ron` inside the content directory
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write the journal to this file as JSON lines
    #[arg(long, value_name = "PATH")]
    journal: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    /// Fail when a step's outcome differs from its `expect_rejection` flag
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One line per step plus balances
    Summary,
    /// The full journal as JSON
    Json,
}

/// Outcome of one replayed step.
struct StepReport {
    step: ScriptStep,
    outcome: std::result::Result<Receipt, RuntimeError>,
}

impl StepReport {
    fn matches_expectation(&self) -> bool {
        self.outcome.is_err() == self.step.expect_rejection
    }
}

impl Run {
    pub async fn execute(self) -> Result<()> {
        let script_path = self
            .script
            .clone()
            .unwrap_or_else(|| self.data.join("scenario.ron"));
        let steps = script::load(&script_path)?;

        let content = Content::load(&self.data)?;
        // Rewards are paid to the identities owning the roster's actors.
        let owners: BTreeSet<Identity> = content
            .roster
            .actors
            .iter()
            .map(|actor| actor.owner)
            .collect();
        let session = Session::start(content, self.journal.as_deref()).await?;
        let handle = session.runtime.handle();

        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            session.clock.set(step.at);
            let outcome = match handle.execute(step.caller, step.command.clone()).await {
                Err(error) if error.rejection().is_none() => {
                    return Err(anyhow::Error::new(error).context("runtime failed while replaying"));
                }
                outcome => outcome,
            };
            reports.push(StepReport { step, outcome });
        }

        let mismatches = reports
            .iter()
            .filter(|report| !report.matches_expectation())
            .count();
        info!(
            target: "sim::run",
            steps = reports.len(),
            mismatches,
            "script replayed"
        );

        let state = handle.query_state().await?;
        let root = state
            .state_root()
            .map(hex::encode)
            .context("Failed to hash final state")?;

        match self.format {
            OutputFormat::Summary => {
                for report in &reports {
                    print_step(report);
                }
                println!();
                println!("balances:");
                for owner in &owners {
                    println!("  {owner}: {}", session.minter.balance(*owner)?);
                }
                for item in session.minter.items()? {
                    println!("  {} received {}", item.recipient, item.item);
                }
                println!("total supply: {}", session.minter.total_supply()?);
                println!("nonce: {}", state.nonce());
                println!("state root: {root}");
            }
            OutputFormat::Json => {
                let entries: Vec<JournalEntry> = handle.journal().await?;
                println!("{}", encounter_runtime::repository::export_json(&entries)?);
            }
        }

        drop(handle);
        session.runtime.shutdown().await?;

        if mismatches > 0 {
            warn!(target: "sim::run", mismatches, "steps did not match expectations");
            if self.strict {
                anyhow::bail!("{mismatches} step(s) did not match their expected outcome");
            }
        }
        Ok(())
    }
}

fn print_step(report: &StepReport) {
    let step = &report.step;
    let marker = if report.matches_expectation() { " " } else { "!" };
    match &report.outcome {
        Ok(receipt) => {
            println!(
                "{marker} t={:<6} {} {:<20} committed nonce {}",
                step.at,
                step.caller,
                step.command.name(),
                receipt.nonce
            );
            for event in &receipt.events {
                println!("      {event:?}");
            }
            for grant in &receipt.grants {
                println!("      grant {grant:?}");
            }
        }
        Err(error) => {
            let (code, category) = error
                .rejection()
                .map(|rejection| (rejection.error_code(), rejection.category()))
                .unwrap_or(("INTERNAL", error.category()));
            println!(
                "{marker} t={:<6} {} {:<20} rejected {code} ({category:?}): {error}",
                step.at,
                step.caller,
                step.command.name(),
            );
        }
    }
}
