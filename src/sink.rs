//! The product console: the scrolling text surface every state change
//! reports to.
//!
//! The console is the single sink for engine output. One engine
//! transition writes at most one entry, so reading the history back
//! replays the session's pacing line for line. Entries persist as JSONL
//! and optionally echo to stdout as they land.

use jiff::Timestamp;

use crate::catalog::{ENGINE_VERSION, PRODUCT, SIGNATURE_DB};
use crate::model::ConsoleEntry;
use crate::storage::{Result, Storage};

/// Append-only writer over the persisted console.
pub struct Console<'a> {
    storage: &'a Storage,
    last_report: Option<String>,
    echo: bool,
}

impl<'a> Console<'a> {
    /// Creates a console writer. With `echo` set, every entry also
    /// prints to stdout as it is appended.
    pub fn new(storage: &'a Storage, echo: bool) -> Self {
        Self {
            storage,
            last_report: None,
            echo,
        }
    }

    /// Appends one entry, stamped now.
    pub fn push(&mut self, text: impl Into<String>) -> Result<()> {
        let entry = ConsoleEntry::now(text);
        self.storage.append_console(&entry)?;
        if self.echo {
            println!("{}", render_entry(&entry));
        }
        Ok(())
    }

    /// Appends an operation's completion entry and retains its analysis
    /// as the session's last report.
    pub fn publish(&mut self, title: &str, analysis: &str) -> Result<()> {
        self.push(format!("{title} COMPLETE\n{analysis}"))?;
        self.last_report = Some(analysis.to_string());
        Ok(())
    }

    /// Analysis text of the most recent completion this session, if any.
    pub fn last_report(&self) -> Option<&str> {
        self.last_report.as_deref()
    }

    /// Full console history, newest first.
    pub fn history(&self) -> Result<Vec<ConsoleEntry>> {
        let mut entries = self.storage.load_console()?;
        entries.reverse();
        Ok(entries)
    }
}

/// Renders one entry the way the console prints it: a stamped first
/// line, continuation lines indented beneath it.
pub fn render_entry(entry: &ConsoleEntry) -> String {
    let mut lines = entry.text.lines();
    let first = lines.next().unwrap_or("");
    let mut out = format!("> [{}] {first}", entry.at.strftime("%H:%M:%S"));
    for line in lines {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

/// The banner shown when the console has no history yet.
pub fn boot_banner() -> String {
    format!(
        "> [{}] {PRODUCT} v{ENGINE_VERSION} initialized.\n\
         > Signature Database: {SIGNATURE_DB}\n\
         > Cloud Sync: SYNCED (Status: Nominal)\n\
         > Awaiting system instruction...",
        Timestamp::now().strftime("%Y-%m-%d")
    )
}
