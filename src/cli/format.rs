//! Output formatting for CLI display.

use crate::catalog::{PlanSpec, ToolCategory, ToolSpec};
use crate::engine::UpdatePhase;
use crate::model::{
    BlockedDomain, Cart, RestorePoint, Severity, Subscription, ThreatCategory, ThreatRecord, Tier,
};

/// One-line license summary for the status panel.
pub(super) fn license_line(subscription: &Subscription) -> String {
    if !subscription.active {
        return "DEMO MODE (no active license)".to_string();
    }
    let tier = subscription.tier.map_or("UNKNOWN", Tier::id);
    match &subscription.expires_at {
        Some(at) => format!("{tier} ACTIVE (expires {})", at.strftime("%Y-%m-%d")),
        None => format!("{tier} ACTIVE (never expires)"),
    }
}

/// Two-line tool listing: roster line plus command and description.
pub(super) fn tool_card(tool: &ToolSpec) -> String {
    let snapshot = if tool.major { "  [restore point]" } else { "" };
    format!(
        "{:<18} {:<28} [{}]{snapshot}\n                   {} — {}",
        tool.id,
        tool.name,
        category_label(tool.category),
        tool.command,
        tool.description
    )
}

fn category_label(category: ToolCategory) -> &'static str {
    match category {
        ToolCategory::System => "system",
        ToolCategory::Network => "network",
        ToolCategory::Defender => "defender",
    }
}

/// One-line plan listing.
pub(super) fn plan_row(plan: &PlanSpec) -> String {
    let badge = plan.badge.map_or(String::new(), |b| format!("  [{b}]"));
    format!(
        "{:<10} ${:>6.2}  {:<12} {}{badge}",
        plan.tier.id(),
        plan.price,
        plan.name,
        plan.blurb
    )
}

/// Two-line threat listing: headline plus description.
pub(super) fn threat_row(threat: &ThreatRecord) -> String {
    format!(
        "{:<9} {:<18} [{}] {} — last seen {}\n          {}",
        severity_label(threat.severity),
        threat.name,
        threat_category_label(threat.category),
        threat.origin.country,
        threat.last_seen,
        threat.description
    )
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "CRITICAL",
        Severity::High => "HIGH",
        Severity::Medium => "MEDIUM",
    }
}

fn threat_category_label(category: ThreatCategory) -> &'static str {
    match category {
        ThreatCategory::Malware => "Malware",
        ThreatCategory::Trojan => "Trojan",
        ThreatCategory::Spyware => "Spyware",
        ThreatCategory::Ransomware => "Ransomware",
    }
}

/// One-line restore point listing.
pub(super) fn restore_row(point: &RestorePoint) -> String {
    format!(
        "{}  {}  {}",
        &point.id.to_string()[..8],
        point.created_at.strftime("%Y-%m-%d %H:%M"),
        point.label
    )
}

/// One-line blocklist listing.
pub(super) fn domain_row(entry: &BlockedDomain) -> String {
    format!(
        "{}  {:<30} {}  {}",
        &entry.id.to_string()[..8],
        entry.domain,
        entry.added_at.strftime("%Y-%m-%d"),
        entry.reason
    )
}

/// Multi-line cart listing with a units-and-subtotal footer.
pub(super) fn cart_manifest(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }
    let mut out = String::new();
    for line in &cart.items {
        out.push_str(&format!(
            "{:<10} x{:<3} ${:>7.2}  {}\n",
            line.id,
            line.quantity,
            line.unit_price * f64::from(line.quantity),
            line.name
        ));
    }
    out.push_str(&format!(
        "{} unit(s), subtotal ${:.2}",
        cart.units(),
        cart.subtotal()
    ));
    out
}

/// Status-panel label for the update channel.
pub(super) fn update_label(phase: UpdatePhase) -> &'static str {
    match phase {
        UpdatePhase::Checking => "CHECKING",
        UpdatePhase::Available => "UPDATES AVAILABLE",
        UpdatePhase::Applying => "APPLYING",
        UpdatePhase::UpToDate => "UP TO DATE",
    }
}
