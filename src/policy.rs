//! Entitlement gate for operations.
//!
//! Every operation passes through [`evaluate`] before it runs. An active
//! license clears everything without cost. Without one, bulk operations
//! are off the table entirely and single-tool runs draw down the demo
//! credit pool, one credit per started run.

use crate::model::{Ledger, Operation};

/// Outcome of gating an operation against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    /// Whether the operation may start.
    pub allowed: bool,
    /// Whether starting it consumes a demo credit.
    pub consumes_credit: bool,
}

/// Decides whether an operation may start and at what cost.
pub fn evaluate(ledger: &Ledger, op: &Operation) -> Gate {
    if ledger.subscribed() {
        return Gate { allowed: true, consumes_credit: false };
    }
    if op.bulk {
        return Gate { allowed: false, consumes_credit: false };
    }
    let allowed = ledger.demo_credits > 0;
    Gate { allowed, consumes_credit: allowed }
}
