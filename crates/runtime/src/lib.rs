//! Runtime orchestration for the encounter engine.
//!
//! This crate wires together oracle access, the reward minter, the audit
//! journal and the sequencer worker into a cohesive runtime API. Consumers
//! embed [`Runtime`] to submit commands, subscribe to events, and read the
//! journal through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps the sequencer internal to the crate
//! - [`clock`] and [`minter`] are the runtime's own collaborators
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod clock;
pub mod events;
pub mod minter;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{CommandEvent, Event, EventBus, RewardEvent, Topic};
pub use minter::{InMemoryMinter, MintedItem, MinterError, RewardMinter};
pub use oracle::OracleManager;
pub use repository::{
    FileJournal, InMemoryJournal, JournalEntry, JournalOutcome, JournalRepository,
    RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
