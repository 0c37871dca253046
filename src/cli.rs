//! CLI interface for Bulwark.
//!
//! Non-interactive subcommands over one shared product console:
//! arguments in, the engine's console lines out. Commands split into
//! three groups:
//!
//! - `bulwark status|tools|threats|log|restore-points` — read the world.
//! - `bulwark run <tool>` / `bulwark purge` — drive the operation engine.
//! - `bulwark plans|cart|checkout|redeem|blocklist` — the store and the
//!   domain blocklist.
//!
//! Engine dwells play out in real time by default; `--instant` (or
//! `pacing = "instant"` in the config) collapses them for scripts.

mod format;

use clap::{Parser, Subcommand};
use jiff::Timestamp;
use uuid::Uuid;

use crate::catalog::{self, PURGE_LABEL, PlanSpec};
use crate::checkout::{
    CheckoutFlow, CheckoutPhase, FraudAgent, Redemption, SignalsAgent, Verdict, tier_for_cart,
};
use crate::config::{Config, Pacing};
use crate::engine::{Admission, OpRun, Session, UpdateChannel};
use crate::intel::{self, BundledIntel};
use crate::model::{BlockedDomain, CartItem, INITIAL_DEMO_CREDITS, Operation};
use crate::sink;
use crate::storage::Storage;

use format::{
    cart_manifest, domain_row, license_line, plan_row, restore_row, threat_row, tool_card,
    update_label,
};

/// Bulwark — endpoint security dashboard.
#[derive(Debug, Parser)]
#[command(name = "bulwark", after_long_help = GUIDE_HELP)]
pub struct Cli {
    /// Collapse engine dwell times to zero (for scripts and tests).
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    pub command: Command,
}

const GUIDE_HELP: &str = r#"Workflow: a first session
  1. bulwark status
     → the update protocol runs; license state and demo credits print
  2. bulwark tools
     → the remediation roster with tool ids
  3. bulwark run sfc
     → restore point, ten scan steps, completion report (one demo credit)
  4. bulwark plans
  5. bulwark cart add 6MONTHS
  6. bulwark checkout
     → fraud screening, then license activation

Store and blocklist:
  bulwark cart qty 6MONTHS --delta -1
  bulwark redeem <code>
  bulwark blocklist add tracking-pixel.example --reason "telemetry"
  bulwark blocklist remove a3b"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Session status: license, credits, patch level, counts.
    ///
    /// Runs the update protocol to completion first.
    Status,

    /// List the remediation tool roster.
    Tools,

    /// Run one remediation tool through the operation engine.
    ///
    /// Demo sessions spend one credit per run. Tools marked
    /// `[restore point]` record a snapshot before scanning.
    Run {
        /// Tool id from `bulwark tools` (e.g. `sfc`).
        tool: String,
    },

    /// Run the full system heuristic purge.
    ///
    /// The aggregate of every remediation tool. Always snapshots first,
    /// and always requires an active license — demo credits cannot
    /// cover it.
    Purge,

    /// Show the current global threat intelligence records.
    Threats,

    /// Print the product console history, newest first.
    Log,

    /// List recorded restore points, newest first.
    RestorePoints,

    /// List license plans.
    Plans,

    /// Manage the order manifest.
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },

    /// Screen and finalize the cart purchase.
    Checkout,

    /// Redeem a promotional code for a lifetime license.
    Redeem {
        /// The code. Case and surrounding whitespace are ignored.
        code: String,
    },

    /// Manage the domain blocklist.
    Blocklist {
        #[command(subcommand)]
        command: BlocklistCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add one unit of a plan (merges into an existing line).
    Add {
        /// Plan id, e.g. `6MONTHS`. Case-insensitive.
        plan: String,
    },

    /// Adjust a line's quantity. Floors at one; use `remove` to drop it.
    Qty {
        /// Plan id of an existing line.
        plan: String,

        /// Signed quantity change, e.g. `--delta -1`.
        #[arg(long, allow_negative_numbers = true)]
        delta: i32,
    },

    /// Remove a line entirely.
    Remove {
        /// Plan id of the line to remove.
        plan: String,
    },

    /// Show the manifest.
    Show,
}

#[derive(Debug, Subcommand)]
pub enum BlocklistCommand {
    /// List blocked domains, newest first.
    List,

    /// Block a domain.
    Add {
        /// Domain to block, e.g. `tracker.example`.
        domain: String,

        /// Why it's blocked.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Unblock an entry by id (full UUID or unambiguous prefix).
    Remove {
        /// Entry id from `bulwark blocklist list`.
        id: String,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();
    let pacing = if cli.instant {
        Pacing::Instant
    } else {
        config.pacing
    };

    match cli.command {
        Command::Status => cmd_status(storage, pacing),
        Command::Tools => cmd_tools(),
        Command::Run { tool } => cmd_run(storage, pacing, &tool),
        Command::Purge => cmd_purge(storage, pacing),
        Command::Threats => cmd_threats(),
        Command::Log => cmd_log(storage),
        Command::RestorePoints => cmd_restore_points(storage),
        Command::Plans => cmd_plans(),
        Command::Cart { command } => cmd_cart(storage, &command),
        Command::Checkout => cmd_checkout(storage, pacing),
        Command::Redeem { code } => cmd_redeem(storage, pacing, &code),
        Command::Blocklist { command } => cmd_blocklist(storage, command),
    }
}

fn open_session(storage: &Storage, pacing: Pacing) -> Result<Session<'_>, String> {
    Session::open(storage, &BundledIntel, pacing, true)
        .map_err(|e| format!("failed to open session: {e}"))
}

fn cmd_status(storage: &Storage, pacing: Pacing) -> Result<(), String> {
    let mut session = open_session(storage, pacing)?;

    let (mut update, boot) = UpdateChannel::start();
    session
        .apply(boot)
        .map_err(|e| format!("console write failed: {e}"))?;
    session
        .pump(&mut [&mut update])
        .map_err(|e| format!("engine failure: {e}"))?;

    let blocklist = storage
        .load_blocklist()
        .map_err(|e| format!("failed to load blocklist: {e}"))?;
    let threats = intel::latest_or_empty(&BundledIntel);

    println!();
    println!("License:        {}", license_line(&session.ledger.subscription));
    println!(
        "Demo credits:   {} of {}",
        session.ledger.demo_credits, INITIAL_DEMO_CREDITS
    );
    println!("Updates:        {}", update_label(update.phase()));
    println!("Restore points: {}", session.ledger.restore_points.len());
    println!("Blocklist:      {} domain(s)", blocklist.len());
    println!("Threat feed:    {} active record(s)", threats.len());
    Ok(())
}

fn cmd_tools() -> Result<(), String> {
    for tool in &catalog::TOOLS {
        println!("{}", tool_card(tool));
    }
    Ok(())
}

fn cmd_run(storage: &Storage, pacing: Pacing, tool_id: &str) -> Result<(), String> {
    let tool = catalog::tool(tool_id)
        .ok_or_else(|| format!("no tool with id '{tool_id}' — see `bulwark tools`"))?;

    let op = Operation {
        label: tool.name.to_string(),
        major: tool.major,
        bulk: false,
    };
    drive_operation(
        storage,
        pacing,
        op,
        "No demo credits remaining — a license is required to continue.",
    )
}

fn cmd_purge(storage: &Storage, pacing: Pacing) -> Result<(), String> {
    let op = Operation {
        label: PURGE_LABEL.to_string(),
        major: false,
        bulk: true,
    };
    drive_operation(
        storage,
        pacing,
        op,
        "The full system purge requires an active license.",
    )
}

/// Admits an operation and, if it starts, drives it and the update
/// channel to completion on the shared console.
fn drive_operation(
    storage: &Storage,
    pacing: Pacing,
    op: Operation,
    denial: &str,
) -> Result<(), String> {
    let mut session = open_session(storage, pacing)?;
    let subscribed = session.ledger.subscribed();

    let mut machine = OpRun::new();
    let admission = session
        .admit(&mut machine, op)
        .map_err(|e| format!("failed to start operation: {e}"))?;
    match admission {
        Admission::Busy => return Err("an operation is already in flight".to_string()),
        Admission::Rejected => {
            println!("{denial}");
            println!("See `bulwark plans` for available licenses.");
            return Ok(());
        }
        Admission::Started => {}
    }

    println!("Initialize Core.System.Heuristics... OK");
    println!("Connecting to Global Threat Intelligence... OK");
    println!(
        "Executing Module: {}... ACTIVE",
        machine.title().unwrap_or_default()
    );
    println!();

    let (mut update, boot) = UpdateChannel::start();
    session
        .apply(boot)
        .map_err(|e| format!("console write failed: {e}"))?;
    session
        .pump(&mut [&mut update, &mut machine])
        .map_err(|e| format!("engine failure: {e}"))?;

    if session.console.last_report().is_some() {
        println!();
        println!(
            "Coverage: {}% of monitored surfaces. Report retained in `bulwark log`.",
            machine.progress()
        );
    }
    if !subscribed {
        println!(
            "Demo credits remaining: {} of {}",
            session.ledger.demo_credits, INITIAL_DEMO_CREDITS
        );
    }
    Ok(())
}

fn cmd_threats() -> Result<(), String> {
    let threats = intel::latest_or_empty(&BundledIntel);
    if threats.is_empty() {
        println!("Threat feed unavailable — no records to show.");
        return Ok(());
    }
    println!("Global threat intelligence — {} active record(s)", threats.len());
    println!();
    for threat in &threats {
        println!("{}", threat_row(threat));
    }
    Ok(())
}

fn cmd_log(storage: &Storage) -> Result<(), String> {
    let console = sink::Console::new(storage, false);
    let entries = console
        .history()
        .map_err(|e| format!("failed to read console: {e}"))?;
    if entries.is_empty() {
        println!("{}", sink::boot_banner());
        return Ok(());
    }
    for entry in &entries {
        println!("{}", sink::render_entry(entry));
    }
    Ok(())
}

fn cmd_restore_points(storage: &Storage) -> Result<(), String> {
    let ledger = storage
        .load_ledger()
        .map_err(|e| format!("failed to load ledger: {e}"))?;
    if ledger.restore_points.is_empty() {
        println!("No restore points");
        return Ok(());
    }
    for point in ledger.restore_points.iter().rev() {
        println!("{}", restore_row(point));
    }
    Ok(())
}

fn cmd_plans() -> Result<(), String> {
    for plan in &catalog::PLANS {
        println!("{}", plan_row(plan));
    }
    println!();
    println!("Activate with `bulwark cart add <plan>` then `bulwark checkout`,");
    println!("or redeem a promotional code with `bulwark redeem <code>`.");
    Ok(())
}

fn cmd_cart(storage: &Storage, command: &CartCommand) -> Result<(), String> {
    let mut cart = storage
        .load_cart()
        .map_err(|e| format!("failed to load cart: {e}"))?;

    match command {
        CartCommand::Add { plan } => {
            let spec = resolve_plan(plan)?;
            cart.add(CartItem {
                id: spec.tier.id().to_string(),
                name: spec.name.to_string(),
                unit_price: spec.price,
                quantity: 1,
                category: "License".to_string(),
            });
        }
        CartCommand::Qty { plan, delta } => {
            let spec = resolve_plan(plan)?;
            cart.bump(spec.tier.id(), *delta);
        }
        CartCommand::Remove { plan } => {
            let spec = resolve_plan(plan)?;
            cart.remove(spec.tier.id());
        }
        CartCommand::Show => {}
    }
    if !matches!(command, CartCommand::Show) {
        storage
            .save_cart(&cart)
            .map_err(|e| format!("failed to save cart: {e}"))?;
    }

    println!("{}", cart_manifest(&cart));
    Ok(())
}

fn resolve_plan(reference: &str) -> Result<&'static PlanSpec, String> {
    let id = reference.trim().to_uppercase();
    catalog::plan(&id).ok_or_else(|| format!("no plan '{reference}' — see `bulwark plans`"))
}

fn cmd_checkout(storage: &Storage, pacing: Pacing) -> Result<(), String> {
    let mut session = open_session(storage, pacing)?;
    if session.cart.is_empty() {
        println!("Cart is empty — add a plan first: `bulwark cart add 6MONTHS`");
        return Ok(());
    }

    let tier = tier_for_cart(&session.cart);
    let score = SignalsAgent.score();

    println!("Fraud Prevention Agent engaged.");
    println!("Assessing Behavioral Signals & Network Integrity...");
    println!();

    let mut flow = CheckoutFlow::new();
    flow.begin(score, tier);
    session
        .pump(&mut [&mut flow])
        .map_err(|e| format!("engine failure: {e}"))?;

    println!();
    match flow.verdict() {
        Some(Verdict::Cleared { score, tier }) => {
            println!(
                "Behavioral audit complete. Confidence index: {:.1}/10.0",
                score * 10.0
            );
            println!("No automated patterns detected. Integrity verified.");
            println!("{} license active.", tier.id());
        }
        Some(Verdict::Flagged { score }) => {
            println!(
                "Behavioral audit complete. Confidence index: {:.1}/10.0",
                score * 10.0
            );
            println!("Anomalous behavior detected. Anti-bot mitigation triggered.");
            println!("Manual verification required — cart preserved, no charge made.");
        }
        None => return Err("screening did not resolve".to_string()),
    }
    Ok(())
}

fn cmd_redeem(storage: &Storage, pacing: Pacing, code: &str) -> Result<(), String> {
    let mut session = open_session(storage, pacing)?;
    let mut flow = CheckoutFlow::new();

    let (redemption, effects) = flow.redeem(code);
    session
        .apply(effects)
        .map_err(|e| format!("failed to apply redemption: {e}"))?;

    match redemption {
        Redemption::Accepted => {
            println!("Code accepted — LIFETIME license active.");
        }
        Redemption::Rejected => {
            if let CheckoutPhase::Notice { message } = flow.phase() {
                println!("{message}");
            }
            // Hold through the notice the way the product does.
            session
                .pump(&mut [&mut flow])
                .map_err(|e| format!("engine failure: {e}"))?;
        }
    }
    Ok(())
}

fn cmd_blocklist(storage: &Storage, command: BlocklistCommand) -> Result<(), String> {
    let mut list = storage
        .load_blocklist()
        .map_err(|e| format!("failed to load blocklist: {e}"))?;

    match command {
        BlocklistCommand::List => {
            if list.is_empty() {
                println!("Blocklist is empty");
                return Ok(());
            }
            for entry in list.iter().rev() {
                println!("{}", domain_row(entry));
            }
        }
        BlocklistCommand::Add { domain, reason } => {
            let entry = BlockedDomain {
                id: Uuid::new_v4(),
                domain,
                reason: reason.unwrap_or_else(|| "User defined risk".to_string()),
                added_at: Timestamp::now(),
            };
            println!("Blocked {} ({})", entry.domain, entry.reason);
            list.push(entry);
            storage
                .save_blocklist(&list)
                .map_err(|e| format!("failed to save blocklist: {e}"))?;
        }
        BlocklistCommand::Remove { id } => {
            let entry = resolve_domain(&list, &id)?;
            let domain = entry.domain.clone();
            let entry_id = entry.id;
            list.retain(|e| e.id != entry_id);
            storage
                .save_blocklist(&list)
                .map_err(|e| format!("failed to save blocklist: {e}"))?;
            println!("Removed {domain}");
        }
    }
    Ok(())
}

/// Resolve a blocklist reference (full UUID or unambiguous prefix).
fn resolve_domain<'a>(
    list: &'a [BlockedDomain],
    reference: &str,
) -> Result<&'a BlockedDomain, String> {
    // Try full UUID first.
    if let Ok(id) = reference.parse::<Uuid>() {
        return list
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| format!("no blocklist entry {id}"));
    }

    // Try as a prefix match.
    let matches: Vec<&BlockedDomain> = list
        .iter()
        .filter(|e| e.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => Err(format!("no blocklist entry matching '{reference}'")),
        1 => Ok(matches[0]),
        n => {
            let ids: Vec<String> = matches
                .iter()
                .map(|e| e.id.to_string()[..8].to_string())
                .collect();
            Err(format!(
                "'{reference}' is ambiguous — matches {n} entries: {}",
                ids.join(", ")
            ))
        }
    }
}
