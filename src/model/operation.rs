//! Operation descriptors: what the gate and the run machine see.

/// A requested action, built transiently from the catalog or the purge
/// entry point. Never persisted.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Display label, also stamped on restore points.
    pub label: String,

    /// Whether a safety snapshot precedes execution.
    pub major: bool,

    /// The aggregate purge action. Demo credits cannot pay for it.
    pub bulk: bool,
}

impl Operation {
    pub fn requires_snapshot(&self) -> bool {
        self.major || self.bulk
    }
}
