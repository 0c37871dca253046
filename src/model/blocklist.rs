//! Domain blocklist types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A domain under block enforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedDomain {
    pub id: Uuid,
    pub domain: String,
    pub reason: String,
    pub added_at: Timestamp,
}
