//! The session engine: effectful state machines on a virtual clock.
//!
//! Machines implement [`Automaton`] and stay pure: advancing returns
//! [`Effect`]s, and the [`Session`] applies them against the ledger,
//! the cart, the console, and the disk. Machines never touch any of
//! those directly.
//!
//! The pump tracks each machine's next due time on a session clock,
//! fires the earliest one, and (under real pacing) sleeps the gap. One
//! fire advances exactly one machine by exactly one transition, and a
//! transition appends at most one console entry, so interleaved
//! machines produce a deterministic console.

mod run;
mod update;

pub use run::{Admission, OpRun, RunPhase};
pub use update::{UpdateChannel, UpdatePhase};

use std::{thread, time::Duration};

use jiff::Timestamp;
use uuid::Uuid;

use crate::config::Pacing;
use crate::intel::{self, Analyst};
use crate::model::{Cart, Ledger, Operation, RestorePoint, Tier};
use crate::policy;
use crate::sink::Console;
use crate::storage::{Result, Storage};

/// A state change requested by a machine, applied by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append one console line.
    Log(String),

    /// Burn one demo credit.
    ConsumeCredit,

    /// Mint a restore point before a system-altering operation.
    RecordSnapshot { label: String },

    /// Emit the completion entry for a finished operation.
    PublishReport { title: String },

    /// Activate a license tier.
    GrantTier { tier: Tier },

    /// Drop the order manifest after a successful purchase.
    EmptyCart,
}

/// A cooperatively scheduled state machine.
pub trait Automaton {
    /// Time until the next transition, or `None` when parked.
    fn dwell(&self) -> Option<Duration>;

    /// Fires the next transition, returning its effects.
    fn advance(&mut self) -> Vec<Effect>;
}

/// One interactive session over the persisted world.
///
/// Owns the in-memory ledger and cart; every mutation an effect makes
/// is written back to storage before the next fire.
pub struct Session<'a> {
    storage: &'a Storage,
    pub console: Console<'a>,
    pub ledger: Ledger,
    pub cart: Cart,
    analyst: &'a dyn Analyst,
    pacing: Pacing,
}

impl<'a> Session<'a> {
    /// Opens a session, loading the persisted world.
    pub fn open(
        storage: &'a Storage,
        analyst: &'a dyn Analyst,
        pacing: Pacing,
        echo: bool,
    ) -> Result<Self> {
        Ok(Self {
            console: Console::new(storage, echo),
            ledger: storage.load_ledger()?,
            cart: storage.load_cart()?,
            storage,
            analyst,
            pacing,
        })
    }

    /// Gates an operation and starts it on the run machine, applying
    /// any admission effects (the demo credit burn).
    pub fn admit(&mut self, machine: &mut OpRun, op: Operation) -> Result<Admission> {
        let gate = policy::evaluate(&self.ledger, &op);
        let (admission, effects) = machine.request(op, gate);
        self.apply(effects)?;
        Ok(admission)
    }

    /// Drives the machines until every one is parked.
    ///
    /// Ties on the clock fire in slice order, so callers fix the
    /// interleaving by fixing the order they pass machines in.
    pub fn pump(&mut self, machines: &mut [&mut dyn Automaton]) -> Result<()> {
        let mut clock = Duration::ZERO;
        let mut due: Vec<Option<Duration>> = machines.iter().map(|m| m.dwell()).collect();
        loop {
            let Some((at, i)) = due
                .iter()
                .enumerate()
                .filter_map(|(i, d)| d.map(|at| (at, i)))
                .min()
            else {
                return Ok(());
            };
            if self.pacing == Pacing::Real {
                thread::sleep(at.saturating_sub(clock));
            }
            clock = at;
            let effects = machines[i].advance();
            self.apply(effects)?;
            due[i] = machines[i].dwell().map(|d| clock + d);
        }
    }

    /// Applies effects in order, persisting each mutation as it lands.
    pub fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Log(text) => self.console.push(text)?,
                Effect::ConsumeCredit => {
                    self.ledger.spend_credit();
                    self.storage.save_credits(self.ledger.demo_credits)?;
                }
                Effect::RecordSnapshot { label } => {
                    let point = RestorePoint {
                        id: Uuid::new_v4(),
                        created_at: Timestamp::now(),
                        label,
                    };
                    self.storage.append_restore_point(&point)?;
                    self.console.push(format!(
                        "[SNAPSHOT] Restore point {} recorded before: {}",
                        &point.id.to_string()[..8],
                        point.label
                    ))?;
                    self.ledger.restore_points.push(point);
                }
                Effect::PublishReport { title } => {
                    let notice = completion_notice(&title);
                    let analysis = intel::assess_or_fallback(self.analyst, &notice);
                    self.console.publish(&title, &analysis)?;
                }
                Effect::GrantTier { tier } => {
                    self.ledger.grant(tier);
                    self.storage.save_subscription(&self.ledger.subscription)?;
                }
                Effect::EmptyCart => {
                    self.cart.clear();
                    self.storage.save_cart(&self.cart)?;
                }
            }
        }
        Ok(())
    }
}

/// The synthetic notice handed to the analyst when an operation ends.
fn completion_notice(title: &str) -> String {
    format!(
        "Operation {title} completed. Scan found 0 malware files. \
         System integrity verified via Bulwark Native Interface."
    )
}
