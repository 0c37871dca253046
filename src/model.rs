//! Core data model for Bulwark.
//!
//! These types are the dashboard's persistent world: the entitlement
//! ledger, operation descriptors, the order manifest, threat feed
//! payloads, and the domain blocklist.

mod blocklist;
mod cart;
mod entitlement;
mod operation;
mod threat;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use blocklist::BlockedDomain;
pub use cart::{Cart, CartItem};
pub use entitlement::{INITIAL_DEMO_CREDITS, Ledger, RestorePoint, Subscription, Tier};
pub use operation::Operation;
pub use threat::{Origin, Severity, ThreatCategory, ThreatRecord};

/// A single line in the product console, serialized as one line of JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub at: Timestamp,
    pub text: String,
}

impl ConsoleEntry {
    /// Stamps a new entry with the current time.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            at: Timestamp::now(),
            text: text.into(),
        }
    }
}
