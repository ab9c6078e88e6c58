//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting commands, reading the journal or streaming events from specific
//! topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use encounter_content::ContentCatalog;
use encounter_core::{Command, EngineState, Identity, Receipt};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::JournalEntry;
use crate::workers::Request;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    request_tx: mpsc::Sender<Request>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(request_tx: mpsc::Sender<Request>, event_bus: EventBus) -> Self {
        Self {
            request_tx,
            event_bus,
        }
    }

    /// Submits a command on behalf of `caller`.
    ///
    /// The sequencer resolves the caller's roles and stamps the time. Reward
    /// grants in the returned receipt have already been handed to the minter.
    pub async fn execute(&self, caller: Identity, command: impl Into<Command>) -> Result<Receipt> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.request_tx
            .send(Request::Execute {
                caller,
                command: Box::new(command.into()),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Installs a content catalog through the admin commands, in order.
    ///
    /// Stops at the first rejected definition; earlier ones stay installed.
    pub async fn install_catalog(
        &self,
        admin: Identity,
        catalog: &ContentCatalog,
    ) -> Result<Vec<Receipt>> {
        let commands = catalog.admin_commands();
        let mut receipts = Vec::with_capacity(commands.len());
        for command in commands {
            receipts.push(self.execute(admin, command).await?);
        }
        Ok(receipts)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Commands` - Committed and rejected commands
    /// - `Topic::Rewards` - Grants paid or refused by the minter
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Query the current engine state (read-only snapshot)
    pub async fn query_state(&self) -> Result<EngineState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.request_tx
            .send(Request::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Every journal entry in sequence order.
    pub async fn journal(&self) -> Result<Vec<JournalEntry>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.request_tx
            .send(Request::Journal { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// The journal as pretty-printed JSON.
    pub async fn export_journal(&self) -> Result<String> {
        let entries = self.journal().await?;
        crate::repository::export_json(&entries).map_err(RuntimeError::from)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
