//! Bulwark configuration.
//!
//! Loaded from `~/.bulwark/config.toml`. The file is optional: missing
//! means defaults, and an unreadable one is ignored with a warning
//! rather than failing startup.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the engine schedules its dwell times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pacing {
    /// Sleep through dwells, like the product.
    #[default]
    Real,

    /// Collapse dwells to zero. Ordering is unchanged.
    Instant,
}

/// Bulwark configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Engine pacing. `--instant` overrides this per invocation.
    pub pacing: Pacing,
}

impl Config {
    /// Load config from `~/.bulwark/config.toml`.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring invalid config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// The config file path: `~/.bulwark/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bulwark").join("config.toml"))
    }
}
