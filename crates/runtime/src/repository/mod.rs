//! Repository layer for the audit journal.
//!
//! The journal records every sequenced command with its outcome. Static
//! content (monsters, actors, items) lives in oracles, not repositories.

mod error;
mod file;
mod journal;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileJournal;
pub use journal::{JournalEntry, JournalOutcome};
pub use memory::InMemoryJournal;
pub use traits::JournalRepository;

/// Renders entries as a pretty-printed JSON array.
pub fn export_json(entries: &[JournalEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
