//! Runtime wrapper around collaborator data.
//!
//! The roster is frozen into an [`OracleSnapshot`] and shared behind an
//! [`Arc`] so the sequencer can build [`encounter_core::Env`] views on demand.
//! The data is immutable at runtime; dynamic state lives in the engine.
use std::sync::Arc;

use encounter_content::WorldRoster;
use encounter_core::{Env, OracleSnapshot};

/// Shares read-only oracle data with the sequencer.
#[derive(Clone)]
pub struct OracleManager {
    snapshot: Arc<OracleSnapshot>,
}

impl OracleManager {
    pub fn new(snapshot: OracleSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    /// Converts oracle manager into the environment the engine reads.
    pub fn as_env(&self) -> Env<'_> {
        self.snapshot.env()
    }

    pub fn snapshot(&self) -> &OracleSnapshot {
        &self.snapshot
    }
}

impl From<WorldRoster> for OracleManager {
    fn from(roster: WorldRoster) -> Self {
        Self::new(roster.into_snapshot())
    }
}
