//! Entitlement types: license tier, demo credits, restore points.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Demo credits granted to a fresh install.
pub const INITIAL_DEMO_CREDITS: u32 = 3;

/// A paid license tier. Serialized under the store's plan ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "1DAY")]
    DayPass,

    #[serde(rename = "1MONTH")]
    Month,

    #[serde(rename = "6MONTHS")]
    SixMonths,

    #[serde(rename = "1YEAR")]
    Year,

    #[serde(rename = "LIFETIME")]
    Lifetime,
}

impl Tier {
    /// The store's plan id for this tier.
    pub fn id(self) -> &'static str {
        match self {
            Self::DayPass => "1DAY",
            Self::Month => "1MONTH",
            Self::SixMonths => "6MONTHS",
            Self::Year => "1YEAR",
            Self::Lifetime => "LIFETIME",
        }
    }

    /// Resolves a plan id back to a tier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "1DAY" => Some(Self::DayPass),
            "1MONTH" => Some(Self::Month),
            "6MONTHS" => Some(Self::SixMonths),
            "1YEAR" => Some(Self::Year),
            "LIFETIME" => Some(Self::Lifetime),
            _ => None,
        }
    }

    /// Coverage length the tier buys. `None` never expires.
    fn term(self) -> Option<SignedDuration> {
        match self {
            Self::DayPass => Some(SignedDuration::from_hours(24)),
            Self::Month => Some(SignedDuration::from_hours(30 * 24)),
            Self::SixMonths => Some(SignedDuration::from_hours(182 * 24)),
            Self::Year => Some(SignedDuration::from_hours(365 * 24)),
            Self::Lifetime => None,
        }
    }
}

/// The persisted license record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    pub tier: Option<Tier>,

    /// True once any paid tier is granted.
    pub active: bool,

    /// Recorded on grant. Expiry is never enforced.
    pub expires_at: Option<Timestamp>,
}

/// A safety-snapshot record written before a system-altering operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorePoint {
    pub id: Uuid,
    pub created_at: Timestamp,

    /// The operation that requested the snapshot.
    pub label: String,
}

/// The single gating authority: license, demo credits, restore points.
///
/// Loaded at startup from its persisted pieces; every mutation is
/// followed by a save of the piece that changed.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub subscription: Subscription,
    pub demo_credits: u32,

    /// Oldest first. Display order is the caller's concern.
    pub restore_points: Vec<RestorePoint>,
}

impl Ledger {
    /// The ledger of a fresh install: no license, full demo allowance.
    pub fn fresh() -> Self {
        Self {
            subscription: Subscription::default(),
            demo_credits: INITIAL_DEMO_CREDITS,
            restore_points: Vec::new(),
        }
    }

    pub fn subscribed(&self) -> bool {
        self.subscription.active
    }

    /// Burns one demo credit. Floor is zero.
    pub fn spend_credit(&mut self) {
        self.demo_credits = self.demo_credits.saturating_sub(1);
    }

    /// Activates a tier, stamping its expiry where one applies.
    pub fn grant(&mut self, tier: Tier) {
        self.subscription = Subscription {
            tier: Some(tier),
            active: true,
            expires_at: tier
                .term()
                .and_then(|t| Timestamp::now().saturating_add(t).ok()),
        };
    }
}
