//! In-memory journal for tests and local runs.

use std::sync::{Arc, RwLock};

use crate::repository::{JournalEntry, JournalRepository, RepositoryError, Result};

/// In-memory journal.
///
/// Clones share storage, so a test can keep one clone and hand the other to
/// the runtime.
#[derive(Clone, Default)]
pub struct InMemoryJournal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalRepository for InMemoryJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<u64> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        entries.push(entry.clone());
        Ok(entries.len() as u64)
    }

    fn entries(&self) -> Result<Vec<JournalEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(entries.clone())
    }

    fn len(&self) -> Result<u64> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        Ok(entries.len() as u64)
    }
}
