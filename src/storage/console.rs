//! Product console persistence.

use crate::model::ConsoleEntry;

use super::{Result, Storage};

const CONSOLE: &str = "console.jsonl";

impl Storage {
    /// Appends one console entry.
    pub fn append_console(&self, entry: &ConsoleEntry) -> Result<()> {
        self.append_line(CONSOLE, entry)
    }

    /// Loads the full console history, oldest first.
    pub fn load_console(&self) -> Result<Vec<ConsoleEntry>> {
        self.read_lines(CONSOLE)
    }
}
