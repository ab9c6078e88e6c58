//! Repository trait definitions.

use crate::repository::{JournalEntry, Result};

/// Append-only store for the audit journal.
///
/// The sequencer is the only writer; entries arrive in sequence order.
pub trait JournalRepository: Send + Sync {
    /// Append an entry, returning the number of entries stored afterwards.
    fn append(&mut self, entry: &JournalEntry) -> Result<u64>;

    /// Read every entry in sequence order.
    fn entries(&self) -> Result<Vec<JournalEntry>>;

    /// Number of stored entries.
    fn len(&self) -> Result<u64>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Flush buffered writes to durable storage.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
