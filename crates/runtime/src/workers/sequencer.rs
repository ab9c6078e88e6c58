//! Sequencer worker that owns the authoritative [`EngineState`].
//!
//! Receives requests from [`crate::RuntimeHandle`], executes commands one at a
//! time via [`Engine`], journals every outcome, publishes events to the
//! EventBus and hands reward grants to the minter once a commit is journaled.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use encounter_content::RoleSettings;
use encounter_core::{
    Command, CommandContext, Engine, EngineState, ExecuteError, GameError, Identity, Receipt,
    RewardGrant,
};

use crate::api::{Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{CommandEvent, Event, EventBus, RewardEvent};
use crate::minter::RewardMinter;
use crate::oracle::OracleManager;
use crate::repository::{JournalEntry, JournalOutcome, JournalRepository};

/// Requests that can be sent to the sequencer
pub enum Request {
    /// Execute a command on behalf of an identity.
    Execute {
        caller: Identity,
        command: Box<Command>,
        reply: oneshot::Sender<Result<Receipt>>,
    },
    /// Query the current engine state (read-only).
    QueryState { reply: oneshot::Sender<EngineState> },
    /// Read the whole journal.
    Journal {
        reply: oneshot::Sender<Result<Vec<JournalEntry>>>,
    },
}

/// Everything the sequencer needs besides its request channel.
pub struct SequencerParts {
    pub state: EngineState,
    pub oracles: OracleManager,
    pub roles: RoleSettings,
    pub clock: Arc<dyn Clock>,
    pub minter: Arc<dyn RewardMinter>,
    pub journal: Box<dyn JournalRepository>,
}

/// Background task that serializes every command.
pub struct SequencerWorker {
    state: EngineState,
    oracles: OracleManager,
    roles: RoleSettings,
    clock: Arc<dyn Clock>,
    minter: Arc<dyn RewardMinter>,
    journal: Box<dyn JournalRepository>,
    request_rx: mpsc::Receiver<Request>,
    event_bus: EventBus,
}

impl SequencerWorker {
    pub fn new(parts: SequencerParts, request_rx: mpsc::Receiver<Request>, event_bus: EventBus) -> Self {
        info!(
            nonce = parts.state.nonce(),
            admins = parts.roles.admins.len(),
            validators = parts.roles.validators.len(),
            "SequencerWorker initialized"
        );

        Self {
            state: parts.state,
            oracles: parts.oracles,
            roles: parts.roles,
            clock: parts.clock,
            minter: parts.minter,
            journal: parts.journal,
            request_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.request_rx.recv().await {
            self.handle_request(request);
        }

        if let Err(error) = self.journal.flush() {
            error!(target: "runtime::sequencer", %error, "Failed to flush journal on shutdown");
        }
        debug!(target: "runtime::sequencer", "Sequencer stopped");
    }

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::Execute {
                caller,
                command,
                reply,
            } => {
                let result = self.sequence(caller, *command);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Request::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Request::Journal { reply } => {
                let result = self.journal.entries().map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("Journal reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Executes one command: authorize and run through the engine, then on
    /// commit journal, publish and mint grants.
    fn sequence(&mut self, identity: Identity, command: Command) -> Result<Receipt> {
        let sequence = self.journal.len()?;
        let ctx = CommandContext::new(self.roles.caller(identity), self.clock.now());
        let before = self.state.clone();

        let result = {
            let mut engine = Engine::new(&mut self.state);
            engine.execute(self.oracles.as_env(), &ctx, &command)
        };

        match result {
            Ok(receipt) => {
                info!(
                    target: "runtime::sequencer",
                    sequence,
                    nonce = receipt.nonce,
                    caller = identity.0,
                    command = command.name(),
                    events = receipt.events.len(),
                    grants = receipt.grants.len(),
                    "Command committed"
                );
                self.commit(sequence, identity, command, receipt, before)
            }
            Err(error) => {
                warn!(
                    target: "runtime::sequencer",
                    sequence,
                    caller = identity.0,
                    command = command.name(),
                    code = error.error_code(),
                    %error,
                    "Command rejected"
                );
                self.reject(sequence, identity, command, ctx, &error);
                Err(RuntimeError::Rejected(error))
            }
        }
    }

    /// Journals the commit before any grant is minted. A commit the journal
    /// cannot record is undone: `before` is restored and nothing is paid.
    fn commit(
        &mut self,
        sequence: u64,
        caller: Identity,
        command: Command,
        receipt: Receipt,
        before: EngineState,
    ) -> Result<Receipt> {
        let state_root = match self.state.state_root() {
            Ok(root) => Some(hex::encode(root)),
            Err(error) => {
                error!(target: "runtime::sequencer", %error, "Failed to compute state root");
                None
            }
        };

        let name = command.name().to_string();
        let entry = JournalEntry {
            sequence,
            at: receipt.at,
            caller,
            command,
            outcome: JournalOutcome::Committed {
                receipt: receipt.clone(),
                state_root,
            },
        };
        if let Err(error) = self.journal.append(&entry) {
            error!(
                target: "runtime::sequencer",
                sequence,
                nonce = receipt.nonce,
                %error,
                "Failed to journal commit; restoring state"
            );
            self.state = before;
            return Err(error.into());
        }

        self.event_bus
            .publish(Event::Command(CommandEvent::Committed {
                sequence,
                caller,
                command: name,
                receipt: receipt.clone(),
            }));

        let unpaid = self.dispatch_grants(&receipt);
        if !unpaid.is_empty() {
            self.record_unpaid(entry, receipt.nonce, unpaid);
        }

        Ok(receipt)
    }

    /// Appends the settlement entry for refused grants. The command stays
    /// committed either way.
    fn record_unpaid(&mut self, committed: JournalEntry, nonce: u64, grants: Vec<RewardGrant>) {
        let entry = JournalEntry {
            sequence: committed.sequence + 1,
            outcome: JournalOutcome::Unpaid { nonce, grants },
            ..committed
        };
        if let Err(error) = self.journal.append(&entry) {
            error!(
                target: "runtime::sequencer",
                sequence = entry.sequence,
                nonce,
                unpaid = entry.outcome.unpaid().len(),
                %error,
                "Failed to journal unpaid grants"
            );
        }
    }

    /// Journals and publishes a rejection. A journal failure here is logged
    /// only; the caller still gets the rejection.
    fn reject(
        &mut self,
        sequence: u64,
        caller: Identity,
        command: Command,
        ctx: CommandContext,
        error: &ExecuteError,
    ) {
        let name = command.name().to_string();
        if let Err(journal_error) = self.journal.append(&JournalEntry {
            sequence,
            at: ctx.now,
            caller,
            command,
            outcome: JournalOutcome::rejected(error),
        }) {
            error!(
                target: "runtime::sequencer",
                sequence,
                error = %journal_error,
                "Failed to journal rejection"
            );
        }

        self.event_bus
            .publish(Event::Command(CommandEvent::Rejected {
                sequence,
                caller,
                command: name,
                code: error.error_code().to_string(),
                category: error.category(),
                message: error.to_string(),
            }));
    }

    /// Pays every grant to the owner of its actor, returning the grants that
    /// could not be paid.
    fn dispatch_grants(&self, receipt: &Receipt) -> Vec<RewardGrant> {
        let env = self.oracles.as_env();
        let mut unpaid = Vec::new();
        for grant in &receipt.grants {
            let paid = env
                .owner_of(grant.recipient())
                .map_err(|error| (None, error.to_string()))
                .and_then(|owner| {
                    self.minter
                        .mint(owner, grant)
                        .map(|()| owner)
                        .map_err(|error| (Some(owner), error.to_string()))
                });

            match paid {
                Ok(owner) => {
                    self.event_bus.publish(Event::Reward(RewardEvent::Paid {
                        nonce: receipt.nonce,
                        owner,
                        grant: *grant,
                    }));
                }
                Err((owner, reason)) => {
                    error!(
                        target: "runtime::sequencer",
                        nonce = receipt.nonce,
                        recipient = %grant.recipient(),
                        owner = ?owner,
                        %reason,
                        "Grant left unpaid"
                    );
                    self.event_bus.publish(Event::Reward(RewardEvent::Failed {
                        nonce: receipt.nonce,
                        owner,
                        grant: *grant,
                        reason,
                    }));
                    unpaid.push(*grant);
                }
            }
        }
        unpaid
    }
}
