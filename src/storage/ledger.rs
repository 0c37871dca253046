//! Entitlement ledger persistence: license, credits, restore points.

use crate::model::{Ledger, RestorePoint, Subscription};

use super::{Result, Storage};

const SUBSCRIPTION: &str = "subscription.json";
const CREDITS: &str = "credits.json";
const RESTORE_POINTS: &str = "restore_points.jsonl";

impl Storage {
    /// Loads the entitlement ledger, defaulting each missing or
    /// unreadable piece independently.
    pub fn load_ledger(&self) -> Result<Ledger> {
        let mut ledger = Ledger::fresh();
        if let Some(subscription) = self.read_doc(SUBSCRIPTION)? {
            ledger.subscription = subscription;
        }
        if let Some(credits) = self.read_doc(CREDITS)? {
            ledger.demo_credits = credits;
        }
        ledger.restore_points = self.read_lines(RESTORE_POINTS)?;
        Ok(ledger)
    }

    /// Writes the license record.
    pub fn save_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.write_doc(SUBSCRIPTION, subscription)
    }

    /// Writes the remaining demo credit count.
    pub fn save_credits(&self, credits: u32) -> Result<()> {
        self.write_doc(CREDITS, &credits)
    }

    /// Appends one restore point to the history.
    pub fn append_restore_point(&self, point: &RestorePoint) -> Result<()> {
        self.append_line(RESTORE_POINTS, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;
    use uuid::Uuid;

    use crate::model::{INITIAL_DEMO_CREDITS, Tier};

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("bulwark")).unwrap();
        (dir, storage)
    }

    #[test]
    fn fresh_root_loads_fresh_ledger() {
        let (_dir, storage) = test_storage();
        let ledger = storage.load_ledger().unwrap();

        assert!(!ledger.subscribed());
        assert_eq!(ledger.demo_credits, INITIAL_DEMO_CREDITS);
        assert!(ledger.restore_points.is_empty());
    }

    #[test]
    fn ledger_pieces_round_trip() {
        let (_dir, storage) = test_storage();

        let mut ledger = Ledger::fresh();
        ledger.grant(Tier::Year);
        ledger.spend_credit();
        storage.save_subscription(&ledger.subscription).unwrap();
        storage.save_credits(ledger.demo_credits).unwrap();
        storage
            .append_restore_point(&RestorePoint {
                id: Uuid::new_v4(),
                created_at: Timestamp::now(),
                label: "System File Integrity".into(),
            })
            .unwrap();

        let loaded = storage.load_ledger().unwrap();
        assert!(loaded.subscribed());
        assert_eq!(loaded.subscription.tier, Some(Tier::Year));
        assert_eq!(loaded.demo_credits, INITIAL_DEMO_CREDITS - 1);
        assert_eq!(loaded.restore_points.len(), 1);
        assert_eq!(loaded.restore_points[0].label, "System File Integrity");
    }

    #[test]
    fn malformed_subscription_falls_back_to_default() {
        let (dir, storage) = test_storage();
        std::fs::write(
            dir.path().join("bulwark").join("subscription.json"),
            "{\"tier\": \"2WEEKS\"",
        )
        .unwrap();

        let ledger = storage.load_ledger().unwrap();
        assert!(!ledger.subscribed());
        assert_eq!(ledger.demo_credits, INITIAL_DEMO_CREDITS);
    }

    #[test]
    fn undecodable_subscription_falls_back_to_default() {
        let (dir, storage) = test_storage();
        std::fs::write(
            dir.path().join("bulwark").join("subscription.json"),
            [0xFF, 0xFE, 0x80, b'{'],
        )
        .unwrap();

        let ledger = storage.load_ledger().unwrap();
        assert!(!ledger.subscribed());
        assert_eq!(ledger.demo_credits, INITIAL_DEMO_CREDITS);
    }

    #[test]
    fn restore_points_accumulate_oldest_first() {
        let (_dir, storage) = test_storage();
        for label in ["first", "second", "third"] {
            storage
                .append_restore_point(&RestorePoint {
                    id: Uuid::new_v4(),
                    created_at: Timestamp::now(),
                    label: label.into(),
                })
                .unwrap();
        }

        let ledger = storage.load_ledger().unwrap();
        let labels: Vec<&str> = ledger
            .restore_points
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(labels, ["first", "second", "third"]);
    }
}
