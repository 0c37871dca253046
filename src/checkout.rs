//! The commerce flow: fraud screening, finalization, promo redemption.
//!
//! Checkout is the only path that writes a paid tier into the ledger,
//! and it does so through effects like every other machine. A cleared
//! screening grants the cart's tier and empties the manifest; a flagged
//! one changes nothing. Promo redemption bypasses the screen entirely.

use std::{mem, time::Duration};

use rand::{Rng, thread_rng};

use crate::catalog::{self, DEFAULT_TIER};
use crate::engine::{Automaton, Effect};
use crate::model::{Cart, Tier};

/// Dwell while behavioral signals are assessed.
const SCREEN_DWELL: Duration = Duration::from_millis(3000);

/// How long an invalid-code notice stays up before self-clearing.
const NOTICE_HOLD: Duration = Duration::from_millis(2500);

/// Minimum confidence score to finalize a purchase.
pub const CLEAR_THRESHOLD: f64 = 0.7;

/// Produces the confidence score for a checkout attempt.
pub trait FraudAgent {
    /// Confidence in [0, 1] that the buyer is a human.
    fn score(&self) -> f64;
}

/// The stock agent: behavioral-signal assessment, simulated.
pub struct SignalsAgent;

impl FraudAgent for SignalsAgent {
    fn score(&self) -> f64 {
        thread_rng().gen_range(0.75..1.0)
    }
}

/// Where the flow currently is.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPhase {
    /// In the store; nothing pending.
    Browsing,

    /// Screening a purchase. The score was sampled when the screen
    /// began; the verdict lands when the dwell fires.
    Screening { score: f64, tier: Tier },

    /// A transient rejection notice, self-clearing.
    Notice { message: String },
}

/// Outcome of the most recent screening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Cleared { score: f64, tier: Tier },
    Flagged { score: f64 },
}

/// Outcome of a promo redemption attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    Accepted,
    Rejected,
}

/// The live commerce flow.
pub struct CheckoutFlow {
    phase: CheckoutPhase,
    verdict: Option<Verdict>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            phase: CheckoutPhase::Browsing,
            verdict: None,
        }
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Verdict of the last screening this session, if one finished.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Starts screening a purchase of `tier` at the given confidence.
    /// Ignored unless the flow is browsing.
    pub fn begin(&mut self, score: f64, tier: Tier) {
        if self.phase == CheckoutPhase::Browsing {
            self.phase = CheckoutPhase::Screening { score, tier };
        }
    }

    /// Redeems a promo code, normalizing case and whitespace first.
    ///
    /// A valid code grants the lifetime tier immediately, skipping the
    /// cart and the fraud screen. An invalid one raises a self-clearing
    /// notice and mutates nothing.
    pub fn redeem(&mut self, code: &str) -> (Redemption, Vec<Effect>) {
        let normalized = code.trim().to_uppercase();
        if catalog::is_promo_code(&normalized) {
            (
                Redemption::Accepted,
                vec![
                    Effect::GrantTier {
                        tier: Tier::Lifetime,
                    },
                    Effect::EmptyCart,
                    Effect::Log(
                        "LICENSE ACTIVATED: LIFETIME (promotional code accepted)".to_string(),
                    ),
                ],
            )
        } else {
            self.phase = CheckoutPhase::Notice {
                message: "Invalid code. Check the spelling and try again.".to_string(),
            };
            (Redemption::Rejected, Vec::new())
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton for CheckoutFlow {
    fn dwell(&self) -> Option<Duration> {
        match self.phase {
            CheckoutPhase::Browsing => None,
            CheckoutPhase::Screening { .. } => Some(SCREEN_DWELL),
            CheckoutPhase::Notice { .. } => Some(NOTICE_HOLD),
        }
    }

    fn advance(&mut self) -> Vec<Effect> {
        match mem::replace(&mut self.phase, CheckoutPhase::Browsing) {
            CheckoutPhase::Browsing => Vec::new(),
            CheckoutPhase::Screening { score, tier } => {
                if score >= CLEAR_THRESHOLD {
                    self.verdict = Some(Verdict::Cleared { score, tier });
                    vec![
                        Effect::GrantTier { tier },
                        Effect::EmptyCart,
                        Effect::Log(format!(
                            "PAYMENT AUTHORIZED: {} license active (confidence {score:.2})",
                            tier.id()
                        )),
                    ]
                } else {
                    // Abort quietly: the store view reports the flag.
                    self.verdict = Some(Verdict::Flagged { score });
                    Vec::new()
                }
            }
            CheckoutPhase::Notice { .. } => Vec::new(),
        }
    }
}

/// Tier a checkout resolves to: the first manifest line carrying a plan
/// id, or the default mid tier.
pub fn tier_for_cart(cart: &Cart) -> Tier {
    cart.items
        .iter()
        .find_map(|line| Tier::from_id(&line.id))
        .unwrap_or(DEFAULT_TIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::config::Pacing;
    use crate::engine::Session;
    use crate::intel::BundledIntel;
    use crate::model::CartItem;
    use crate::storage::Storage;

    fn line(id: &str) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: id.to_string(),
            unit_price: 7.99,
            quantity: 1,
            category: "License".to_string(),
        }
    }

    #[test]
    fn cart_tier_is_first_recognizable_line() {
        let mut cart = Cart::default();
        cart.add(line("GIFT-WRAP"));
        cart.add(line("1YEAR"));
        cart.add(line("1DAY"));
        assert_eq!(tier_for_cart(&cart), Tier::Year);
    }

    #[test]
    fn unrecognizable_cart_falls_back_to_default() {
        let mut cart = Cart::default();
        cart.add(line("GIFT-WRAP"));
        assert_eq!(tier_for_cart(&cart), DEFAULT_TIER);
        assert_eq!(tier_for_cart(&Cart::default()), DEFAULT_TIER);
    }

    #[test]
    fn cleared_screening_grants_and_empties() {
        let mut flow = CheckoutFlow::new();
        flow.begin(0.91, Tier::Month);
        assert_eq!(flow.dwell(), Some(SCREEN_DWELL));

        let effects = flow.advance();
        assert_eq!(effects.len(), 3);
        assert_eq!(
            effects[0],
            Effect::GrantTier { tier: Tier::Month }
        );
        assert_eq!(effects[1], Effect::EmptyCart);
        assert!(matches!(&effects[2], Effect::Log(text)
            if text == "PAYMENT AUTHORIZED: 1MONTH license active (confidence 0.91)"));

        assert_eq!(
            flow.verdict(),
            Some(Verdict::Cleared {
                score: 0.91,
                tier: Tier::Month
            })
        );
        assert_eq!(*flow.phase(), CheckoutPhase::Browsing);
    }

    #[test]
    fn threshold_score_clears() {
        let mut flow = CheckoutFlow::new();
        flow.begin(CLEAR_THRESHOLD, Tier::DayPass);
        let effects = flow.advance();
        assert!(!effects.is_empty());
    }

    #[test]
    fn flagged_screening_changes_nothing() {
        let mut flow = CheckoutFlow::new();
        flow.begin(0.42, Tier::Year);

        let effects = flow.advance();
        assert!(effects.is_empty());
        assert_eq!(flow.verdict(), Some(Verdict::Flagged { score: 0.42 }));
        assert_eq!(*flow.phase(), CheckoutPhase::Browsing);
    }

    #[test]
    fn begin_is_ignored_mid_screen() {
        let mut flow = CheckoutFlow::new();
        flow.begin(0.9, Tier::Month);
        flow.begin(0.1, Tier::Lifetime);
        assert_eq!(
            *flow.phase(),
            CheckoutPhase::Screening {
                score: 0.9,
                tier: Tier::Month
            }
        );
    }

    #[test]
    fn promo_is_normalized_and_grants_lifetime() {
        let mut flow = CheckoutFlow::new();
        let (redemption, effects) = flow.redeem("  bulwark-vip ");

        assert_eq!(redemption, Redemption::Accepted);
        assert_eq!(
            effects[0],
            Effect::GrantTier {
                tier: Tier::Lifetime
            }
        );
        assert_eq!(effects[1], Effect::EmptyCart);
        assert_eq!(*flow.phase(), CheckoutPhase::Browsing);
    }

    #[test]
    fn invalid_promo_raises_a_self_clearing_notice() {
        let mut flow = CheckoutFlow::new();
        let (redemption, effects) = flow.redeem("OPEN-SESAME");

        assert_eq!(redemption, Redemption::Rejected);
        assert!(effects.is_empty());
        assert!(matches!(flow.phase(), CheckoutPhase::Notice { .. }));
        assert_eq!(flow.dwell(), Some(NOTICE_HOLD));

        assert!(flow.advance().is_empty());
        assert_eq!(*flow.phase(), CheckoutPhase::Browsing);
        assert_eq!(flow.dwell(), None);
    }

    #[test]
    fn session_finalizes_a_cleared_checkout() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("bulwark")).unwrap();
        let mut session = Session::open(&storage, &BundledIntel, Pacing::Instant, false).unwrap();

        session.cart.add(line("1YEAR"));
        storage.save_cart(&session.cart).unwrap();

        let mut flow = CheckoutFlow::new();
        flow.begin(0.88, tier_for_cart(&session.cart));
        session.pump(&mut [&mut flow]).unwrap();

        assert!(session.ledger.subscribed());
        assert_eq!(session.ledger.subscription.tier, Some(Tier::Year));
        assert!(session.cart.is_empty());

        let persisted = storage.load_ledger().unwrap();
        assert_eq!(persisted.subscription.tier, Some(Tier::Year));
        assert!(storage.load_cart().unwrap().is_empty());

        let entries = storage.load_console().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.starts_with("PAYMENT AUTHORIZED: 1YEAR"));
    }

    #[test]
    fn six_month_purchase_clears_at_mid_confidence() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("bulwark")).unwrap();
        let mut session = Session::open(&storage, &BundledIntel, Pacing::Instant, false).unwrap();

        session.cart.add(line("6MONTHS"));
        storage.save_cart(&session.cart).unwrap();

        let mut flow = CheckoutFlow::new();
        flow.begin(0.85, tier_for_cart(&session.cart));
        session.pump(&mut [&mut flow]).unwrap();

        assert_eq!(
            flow.verdict(),
            Some(Verdict::Cleared {
                score: 0.85,
                tier: Tier::SixMonths
            })
        );
        assert!(session.ledger.subscribed());
        assert_eq!(session.ledger.subscription.tier, Some(Tier::SixMonths));
        assert!(session.cart.is_empty());
    }
}
