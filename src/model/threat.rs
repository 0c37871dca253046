//! Threat feed payload types.

use serde::{Deserialize, Serialize};

/// One entry from the threat intelligence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub name: String,
    pub category: ThreatCategory,
    pub severity: Severity,
    pub description: String,

    /// Freeform recency, as the feed reports it.
    pub last_seen: String,

    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatCategory {
    Malware,
    Trojan,
    Spyware,
    Ransomware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

/// Geographic origin for the threat map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}
