//! Minimal stderr logger behind the `log` facade.

use std::env;

use log::{LevelFilter, Metadata, Record};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the logger at `default_level`, overridable via the
/// `BULWARK_LOG` environment variable. Safe to call more than once;
/// later calls are ignored.
pub fn init(default_level: &str) {
    let level = env::var("BULWARK_LOG").unwrap_or_else(|_| default_level.to_string());
    let filter = level.parse().unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(filter);
    }
}
