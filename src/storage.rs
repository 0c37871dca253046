//! Local persistence for the dashboard's state.
//!
//! Everything lives as flat documents under one root:
//!
//! ```text
//! <root>/
//!   subscription.json     # Active license, if any
//!   credits.json          # Remaining demo credits
//!   restore_points.jsonl  # Append-only restore point history
//!   cart.json             # Order manifest
//!   blocklist.json        # Domain blocklist
//!   console.jsonl         # Append-only product console
//! ```

use std::{fs, io, path::PathBuf};

// Trait must be in scope for `.write_all()` on File.
use io::Write;

use serde::{Serialize, de::DeserializeOwned};

mod blocklist;
mod cart;
mod console;
mod ledger;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based storage for the dashboard's documents.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.bulwark/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bulwark"))
    }

    // ── Documents ──

    /// Reads a whole-document JSON file, if present.
    ///
    /// A malformed document, undecodable bytes included, is logged and
    /// discarded rather than surfaced, so startup always proceeds, at
    /// worst back to defaults.
    fn read_doc<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let bytes = match fs::read(self.root.join(name)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                log::warn!("discarding malformed {name}: {e}");
                Ok(None)
            }
        }
    }

    /// Writes a whole-document JSON file.
    fn write_doc<T: Serialize + ?Sized>(&self, name: &str, doc: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(self.root.join(name), json)?;
        Ok(())
    }

    /// Appends one record to a JSONL file.
    fn append_line<T: Serialize>(&self, name: &str, record: &T) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(name))?;
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Loads every well-formed record from a JSONL file, oldest first.
    ///
    /// Malformed lines, undecodable bytes included, are logged and
    /// skipped so one bad record can't hold the rest of the history
    /// hostage.
    fn read_lines<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let bytes = match fs::read(self.root.join(name)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut records = Vec::new();
        for line in bytes.split(|b| *b == b'\n') {
            if line.is_empty() {
                continue;
            }
            match serde_json::from_slice(line) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("skipping malformed line in {name}: {e}"),
            }
        }
        Ok(records)
    }
}
