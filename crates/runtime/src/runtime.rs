//! High-level runtime orchestrator.
//!
//! The runtime owns the sequencer worker, wires up request/event channels, and
//! exposes a builder-based API for clients to drive the engine.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use encounter_content::{ContentConfig, RoleSettings};
use encounter_core::{EngineConfig, EngineState};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::clock::{Clock, SystemClock};
use crate::events::EventBus;
use crate::minter::{InMemoryMinter, RewardMinter};
use crate::oracle::OracleManager;
use crate::repository::{InMemoryJournal, JournalRepository};
use crate::workers::{SequencerParts, SequencerWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub roles: RoleSettings,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            roles: RoleSettings::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl From<ContentConfig> for RuntimeConfig {
    fn from(config: ContentConfig) -> Self {
        Self {
            engine: config.engine,
            roles: config.roles,
            ..Self::default()
        }
    }
}

/// Main runtime that sequences engine commands
///
/// Design: Runtime owns the worker and coordinates shutdown.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker drains queued requests and stops once every handle clone is
    /// dropped; this waits for that.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<EngineState>,
    oracles: Option<OracleManager>,
    clock: Option<Arc<dyn Clock>>,
    minter: Option<Arc<dyn RewardMinter>>,
    journal: Option<Box<dyn JournalRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            oracles: None,
            clock: None,
            minter: None,
            journal: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial engine state. Defaults to an empty state built from
    /// the configured [`EngineConfig`].
    pub fn initial_state(mut self, state: EngineState) -> Self {
        self.state = Some(state);
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Time source. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Reward sink. Defaults to a fresh [`InMemoryMinter`].
    pub fn minter(mut self, minter: Arc<dyn RewardMinter>) -> Self {
        self.minter = Some(minter);
        self
    }

    /// Journal store. Defaults to an [`InMemoryJournal`].
    pub fn journal(mut self, journal: impl JournalRepository + 'static) -> Self {
        self.journal = Some(Box::new(journal));
        self
    }

    /// Build the runtime and spawn the sequencer
    pub async fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let state = self
            .state
            .unwrap_or_else(|| EngineState::new(self.config.engine.clone()));

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let (request_tx, request_rx) = mpsc::channel(self.config.command_buffer_size);

        let parts = SequencerParts {
            state,
            oracles,
            roles: self.config.roles,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            minter: self
                .minter
                .unwrap_or_else(|| Arc::new(InMemoryMinter::new())),
            journal: self
                .journal
                .unwrap_or_else(|| Box::new(InMemoryJournal::new())),
        };
        let worker = SequencerWorker::new(parts, request_rx, event_bus.clone());
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle: RuntimeHandle::new(request_tx, event_bus),
            worker_handle,
        })
    }
}
