//! JSON-lines journal file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::repository::{JournalEntry, JournalRepository, RepositoryError, Result};

/// Append-only journal stored as one JSON object per line.
///
/// Writes are buffered; [`JournalRepository::flush`] makes them durable and
/// reads flush first.
pub struct FileJournal {
    path: PathBuf,
    writer: BufWriter<File>,
    len: u64,
}

impl FileJournal {
    /// Create a new journal file.
    ///
    /// # Errors
    ///
    /// Returns error if the file already exists (prevents accidental overwrites).
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    RepositoryError::LogAlreadyExists(path.display().to_string())
                }
                _ => RepositoryError::Io(error),
            })?;

        tracing::debug!("Created journal: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            len: 0,
        })
    }

    /// Open an existing journal for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let len = read_entries(path)?.len() as u64;
        let file = OpenOptions::new().append(true).open(path)?;

        tracing::debug!("Opened journal: {} with {} entries", path.display(), len);

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|error| RepositoryError::CorruptedData {
            line: index + 1,
            reason: error.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

impl JournalRepository for FileJournal {
    fn append(&mut self, entry: &JournalEntry) -> Result<u64> {
        serde_json::to_writer(&mut self.writer, entry)?;
        self.writer.write_all(b"\n")?;
        self.len += 1;
        Ok(self.len)
    }

    fn entries(&self) -> Result<Vec<JournalEntry>> {
        read_entries(&self.path)
    }

    fn len(&self) -> Result<u64> {
        Ok(self.len)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for FileJournal {
    fn drop(&mut self) {
        if let Err(error) = self.writer.flush() {
            tracing::error!("Failed to flush journal {}: {}", self.path.display(), error);
        }
    }
}
