//! The update channel: an always-on patch-status machine.
//!
//! Runs once per session through checking, available, applying, up to
//! date, one console line per phase. The terminal phase is sticky; the
//! channel never re-checks and never gates anything else.

use std::time::Duration;

use super::{Automaton, Effect};

const CHECK_DWELL: Duration = Duration::from_millis(1500);
const AVAILABLE_DWELL: Duration = Duration::from_millis(1000);
const APPLY_DWELL: Duration = Duration::from_millis(4000);

/// Patch status reported by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Checking,
    Available,
    Applying,
    UpToDate,
}

/// The session's update channel.
pub struct UpdateChannel {
    phase: UpdatePhase,
}

impl UpdateChannel {
    /// Starts the protocol, announcing it immediately.
    pub fn start() -> (Self, Vec<Effect>) {
        (
            Self {
                phase: UpdatePhase::Checking,
            },
            vec![Effect::Log(
                "INITIATING GLOBAL UPDATE PROTOCOL...".to_string(),
            )],
        )
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }
}

impl Automaton for UpdateChannel {
    fn dwell(&self) -> Option<Duration> {
        match self.phase {
            UpdatePhase::Checking => Some(CHECK_DWELL),
            UpdatePhase::Available => Some(AVAILABLE_DWELL),
            UpdatePhase::Applying => Some(APPLY_DWELL),
            UpdatePhase::UpToDate => None,
        }
    }

    fn advance(&mut self) -> Vec<Effect> {
        match self.phase {
            UpdatePhase::Checking => {
                self.phase = UpdatePhase::Available;
                vec![Effect::Log(
                    "UPDATES FOUND: Core Engine v4.5.3, Signature DB #921, Network Heuristics v2.1"
                        .to_string(),
                )]
            }
            UpdatePhase::Available => {
                self.phase = UpdatePhase::Applying;
                vec![Effect::Log(
                    "APPLYING UPDATES AUTOMATICALLY (Core modules, malware definitions & engine patches)..."
                        .to_string(),
                )]
            }
            UpdatePhase::Applying => {
                self.phase = UpdatePhase::UpToDate;
                vec![Effect::Log(
                    "SYSTEM FULLY PATCHED. NO INTERVENTION REQUIRED.".to_string(),
                )]
            }
            UpdatePhase::UpToDate => Vec::new(),
        }
    }
}
