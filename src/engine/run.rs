//! The operation run machine: gate, snapshot, scan, report, reset.
//!
//! One instance exists per session and at most one operation is ever in
//! flight on it. Once admitted, a run walks its phases deterministically
//! to completion; there is no abort path.

use std::time::Duration;

use crate::catalog::SCAN_TARGETS;
use crate::model::Operation;
use crate::policy::Gate;

use super::{Automaton, Effect};

/// Dwell before the restore point lands.
const SNAPSHOT_DWELL: Duration = Duration::from_millis(1500);

/// Cadence of scan steps.
const STEP_INTERVAL: Duration = Duration::from_millis(300);

/// Pause between the last scan step and the completion report.
const COMPLETION_HOLD: Duration = Duration::from_millis(1000);

/// How long the report stays up before the machine resets.
const REPORT_HOLD: Duration = Duration::from_millis(4000);

/// Lifecycle phase of the run machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    /// Transient: entered and resolved within a single request call.
    Gating,
    Snapshotting,
    /// `step` is the index of the next scan target to announce.
    Executing { step: usize },
    Completed,
}

/// Outcome of asking the machine to start an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The run started; phases advance on the pump.
    Started,

    /// Another run is in flight; the request is dropped.
    Busy,

    /// The gate refused; surface the store instead.
    Rejected,
}

/// The live operation run.
pub struct OpRun {
    phase: RunPhase,
    progress: u8,
    op: Option<Operation>,
}

impl OpRun {
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Idle,
            progress: 0,
            op: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Scan progress, 0 to 100, non-decreasing within a run. Holds its
    /// final value through the reset so callers can read it afterwards.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Label of the operation in flight, if any.
    pub fn title(&self) -> Option<&str> {
        self.op.as_ref().map(|op| op.label.as_str())
    }

    /// Starts an operation under an already-evaluated gate.
    ///
    /// Re-entrant requests while a run is in flight are dropped, and a
    /// refused gate leaves no trace in the console.
    pub fn request(&mut self, op: Operation, gate: Gate) -> (Admission, Vec<Effect>) {
        if self.phase != RunPhase::Idle {
            return (Admission::Busy, Vec::new());
        }
        self.phase = RunPhase::Gating;
        if !gate.allowed {
            self.phase = RunPhase::Idle;
            return (Admission::Rejected, Vec::new());
        }
        let mut effects = Vec::new();
        if gate.consumes_credit {
            effects.push(Effect::ConsumeCredit);
        }
        self.progress = 0;
        self.phase = if op.requires_snapshot() {
            RunPhase::Snapshotting
        } else {
            RunPhase::Executing { step: 0 }
        };
        self.op = Some(op);
        (Admission::Started, effects)
    }

    fn label(&self) -> String {
        self.op
            .as_ref()
            .map(|op| op.label.clone())
            .unwrap_or_default()
    }
}

impl Default for OpRun {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton for OpRun {
    fn dwell(&self) -> Option<Duration> {
        match self.phase {
            RunPhase::Idle | RunPhase::Gating => None,
            RunPhase::Snapshotting => Some(SNAPSHOT_DWELL),
            RunPhase::Executing { step } if step < SCAN_TARGETS.len() => Some(STEP_INTERVAL),
            RunPhase::Executing { .. } => Some(COMPLETION_HOLD),
            RunPhase::Completed => Some(REPORT_HOLD),
        }
    }

    fn advance(&mut self) -> Vec<Effect> {
        match self.phase {
            RunPhase::Idle | RunPhase::Gating => Vec::new(),
            RunPhase::Snapshotting => {
                self.phase = RunPhase::Executing { step: 0 };
                vec![Effect::RecordSnapshot {
                    label: self.label(),
                }]
            }
            RunPhase::Executing { step } if step < SCAN_TARGETS.len() => {
                let target = SCAN_TARGETS[step];
                let done = step + 1;
                self.progress = u8::try_from(done * 100 / SCAN_TARGETS.len()).unwrap_or(100);
                self.phase = RunPhase::Executing { step: done };
                vec![Effect::Log(format!("[SCAN] Checking: {target}"))]
            }
            RunPhase::Executing { .. } => {
                self.progress = 100;
                self.phase = RunPhase::Completed;
                vec![Effect::PublishReport {
                    title: self.label(),
                }]
            }
            RunPhase::Completed => {
                self.phase = RunPhase::Idle;
                self.op = None;
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minor_op() -> Operation {
        Operation {
            label: "Adware Sweep".into(),
            major: false,
            bulk: false,
        }
    }

    fn major_op() -> Operation {
        Operation {
            label: "System File Integrity".into(),
            major: true,
            bulk: false,
        }
    }

    const OPEN: Gate = Gate {
        allowed: true,
        consumes_credit: false,
    };

    #[test]
    fn refused_gate_resets_to_idle_silently() {
        let mut machine = OpRun::new();
        let (admission, effects) = machine.request(
            minor_op(),
            Gate {
                allowed: false,
                consumes_credit: false,
            },
        );

        assert_eq!(admission, Admission::Rejected);
        assert!(effects.is_empty());
        assert_eq!(machine.phase(), RunPhase::Idle);
        assert_eq!(machine.title(), None);
    }

    #[test]
    fn reentrant_requests_are_dropped() {
        let mut machine = OpRun::new();
        let (first, _) = machine.request(minor_op(), OPEN);
        assert_eq!(first, Admission::Started);

        let (second, effects) = machine.request(major_op(), OPEN);
        assert_eq!(second, Admission::Busy);
        assert!(effects.is_empty());
        assert_eq!(machine.title(), Some("Adware Sweep"));
    }

    #[test]
    fn credit_burn_rides_the_admission() {
        let mut machine = OpRun::new();
        let (_, effects) = machine.request(
            minor_op(),
            Gate {
                allowed: true,
                consumes_credit: true,
            },
        );
        assert_eq!(effects, vec![Effect::ConsumeCredit]);
    }

    #[test]
    fn minor_run_walks_scan_report_reset() {
        let mut machine = OpRun::new();
        machine.request(minor_op(), OPEN);
        assert_eq!(machine.phase(), RunPhase::Executing { step: 0 });

        let mut last_progress = 0;
        for step in 0..SCAN_TARGETS.len() {
            assert_eq!(machine.dwell(), Some(STEP_INTERVAL));
            let effects = machine.advance();
            assert_eq!(
                effects,
                vec![Effect::Log(format!("[SCAN] Checking: {}", SCAN_TARGETS[step]))]
            );
            assert!(machine.progress() >= last_progress);
            last_progress = machine.progress();
        }
        assert_eq!(machine.progress(), 100);

        assert_eq!(machine.dwell(), Some(COMPLETION_HOLD));
        let effects = machine.advance();
        assert_eq!(
            effects,
            vec![Effect::PublishReport {
                title: "Adware Sweep".into()
            }]
        );
        assert_eq!(machine.phase(), RunPhase::Completed);

        assert_eq!(machine.dwell(), Some(REPORT_HOLD));
        assert!(machine.advance().is_empty());
        assert_eq!(machine.phase(), RunPhase::Idle);
        assert_eq!(machine.progress(), 100);
        assert_eq!(machine.title(), None);
        assert_eq!(machine.dwell(), None);

        machine.request(major_op(), OPEN);
        assert_eq!(machine.progress(), 0);
    }

    #[test]
    fn major_run_snapshots_first() {
        let mut machine = OpRun::new();
        machine.request(major_op(), OPEN);
        assert_eq!(machine.phase(), RunPhase::Snapshotting);
        assert_eq!(machine.dwell(), Some(SNAPSHOT_DWELL));

        let effects = machine.advance();
        assert_eq!(
            effects,
            vec![Effect::RecordSnapshot {
                label: "System File Integrity".into()
            }]
        );
        assert_eq!(machine.phase(), RunPhase::Executing { step: 0 });
    }
}
