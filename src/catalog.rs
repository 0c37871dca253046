//! Static product catalog: the tool roster, scan targets, license plans,
//! promotional code digests, and the seed blocklist.
//!
//! Classification lives here so the gate and the run machine read one
//! table instead of flags scattered at call sites.

use sha2::{Digest, Sha256};

use crate::model::Tier;

/// Product name shown in banners and reports.
pub const PRODUCT: &str = "Bulwark Engine";

/// Engine version string shown in the boot banner.
pub const ENGINE_VERSION: &str = "4.5.5-stable";

/// Signature database blurb shown in the boot banner.
pub const SIGNATURE_DB: &str = "512M+ known threat signatures";

/// Label for the bulk remediation operation.
pub const PURGE_LABEL: &str = "FULL SYSTEM HEURISTIC PURGE";

// ── Tools ──

/// Broad grouping for a remediation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCategory {
    System,
    Network,
    Defender,
}

/// One entry in the remediation tool roster.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub command: &'static str,
    pub description: &'static str,
    pub category: ToolCategory,
    /// Whether the tool modifies the system and so warrants a restore point.
    pub major: bool,
}

/// The full remediation tool roster.
pub const TOOLS: [ToolSpec; 8] = [
    ToolSpec {
        id: "mrt",
        name: "Malicious Software Removal",
        command: "mrt.exe",
        description: "Runs the Windows Malicious Software Removal Tool.",
        category: ToolCategory::System,
        major: true,
    },
    ToolSpec {
        id: "adwcleaner",
        name: "Adware Sweep",
        command: "adwcleaner.exe /scan",
        description: "Scans for adware, toolbars, and potentially unwanted programs.",
        category: ToolCategory::System,
        major: false,
    },
    ToolSpec {
        id: "quarantine-check",
        name: "Quarantine Audit",
        command: "MpCmdRun.exe -Restore -ListAll",
        description: "Lists items currently held in Defender quarantine.",
        category: ToolCategory::Defender,
        major: false,
    },
    ToolSpec {
        id: "sfc",
        name: "System File Integrity",
        command: "sfc /scannow",
        description: "Verifies and repairs protected system files.",
        category: ToolCategory::System,
        major: true,
    },
    ToolSpec {
        id: "dism",
        name: "Component Store Repair",
        command: "DISM /Online /Cleanup-Image /RestoreHealth",
        description: "Repairs the Windows component store image.",
        category: ToolCategory::System,
        major: true,
    },
    ToolSpec {
        id: "defender-offline",
        name: "Defender Offline Scan",
        command: "MpCmdRun.exe -Scan -ScanType 3",
        description: "Schedules a boot-time scan outside the running OS.",
        category: ToolCategory::Defender,
        major: false,
    },
    ToolSpec {
        id: "network-reset",
        name: "Network Stack Reset",
        command: "netsh winsock reset",
        description: "Resets the Winsock catalog and TCP/IP stack.",
        category: ToolCategory::Network,
        major: true,
    },
    ToolSpec {
        id: "cert-mgr",
        name: "Certificate Store Audit",
        command: "certmgr.msc",
        description: "Reviews trusted root certificates for rogue entries.",
        category: ToolCategory::Network,
        major: false,
    },
];

/// Looks up a tool by its catalog id.
pub fn tool(id: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|t| t.id == id)
}

// ── Scan targets ──

/// Surfaces inspected during an operation, in scan order.
pub const SCAN_TARGETS: [&str; 10] = [
    r"C:\Windows\System32\drivers\etc\hosts",
    r"C:\Users\Admin\AppData\Local\Google\Chrome\User Data\Default\Extensions",
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Run",
    r"C:\Windows\System32\ntoskrnl.exe",
    r"C:\Windows\System32\lsass.exe",
    r"C:\Users\Public\Downloads\hidden_installer.tmp",
    r"C:\Windows\Temp\~DF3821.tmp",
    "Network Stack: Port 8080 (ESTABLISHED)",
    "Browser: Cookies Analysis (Cross-Site Tracking detected)",
    "Registry: Shell Open Command override check",
];

// ── Plans ──

/// One purchasable license plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanSpec {
    pub tier: Tier,
    pub name: &'static str,
    pub price: f64,
    pub blurb: &'static str,
    pub badge: Option<&'static str>,
}

/// Every plan on offer, cheapest first.
pub const PLANS: [PlanSpec; 5] = [
    PlanSpec {
        tier: Tier::DayPass,
        name: "1 Day Pass",
        price: 1.99,
        blurb: "Emergency quick fix",
        badge: None,
    },
    PlanSpec {
        tier: Tier::Month,
        name: "1 Month",
        price: 4.99,
        blurb: "Standard protection",
        badge: None,
    },
    PlanSpec {
        tier: Tier::SixMonths,
        name: "6 Months",
        price: 7.99,
        blurb: "Most popular choice",
        badge: Some("BEST VALUE"),
    },
    PlanSpec {
        tier: Tier::Year,
        name: "1 Year",
        price: 12.99,
        blurb: "Long-term security",
        badge: None,
    },
    PlanSpec {
        tier: Tier::Lifetime,
        name: "Lifetime",
        price: 18.99,
        blurb: "Forever protected",
        badge: Some("ELITE"),
    },
];

/// Plan assumed when a checkout carries no recognizable license line.
pub const DEFAULT_TIER: Tier = Tier::SixMonths;

/// Looks up a plan by its tier id.
pub fn plan(id: &str) -> Option<&'static PlanSpec> {
    PLANS.iter().find(|p| p.tier.id() == id)
}

// ── Promotional codes ──

/// SHA-256 digests of the accepted promotional codes. Only the digests
/// ship; the codes themselves are distributed out of band.
const PROMO_DIGESTS: [&str; 3] = [
    "d6abd6bdb54812bb52866ccca45cf84b9cec32521e8d0e656998a4a6b80de11f",
    "91960eee30909164882f5c6e250e78452ef2201a5a2b9f7b142678962719bd87",
    "70f92175fcdacef5ef3f4e5827f254efb989cc818aa432a1a0a00e55a8cf2f94",
];

/// Whether a (normalized) code matches one of the shipped promo digests.
pub fn is_promo_code(code: &str) -> bool {
    let digest = hex::encode(Sha256::digest(code.as_bytes()));
    PROMO_DIGESTS.contains(&digest.as_str())
}

// ── Seed blocklist ──

/// Domains blocked out of the box.
pub const SEED_BLOCKLIST: [&str; 5] = [
    "evil-tracker.net",
    "malware-dist.io",
    "crypto-miner-pool.xyz",
    "phish-login-bank.com",
    "adware-clicker.tech",
];
