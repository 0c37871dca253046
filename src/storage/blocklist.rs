//! Domain blocklist persistence.

use jiff::Timestamp;
use uuid::Uuid;

use crate::catalog::SEED_BLOCKLIST;
use crate::model::BlockedDomain;

use super::{Result, Storage};

const BLOCKLIST: &str = "blocklist.json";

/// Reason recorded for seeded entries.
const SEED_REASON: &str = "Known malicious entity";

impl Storage {
    /// Loads the blocklist, seeding the stock entries on first use.
    ///
    /// An explicitly emptied list stays empty; only a missing or
    /// unreadable document re-seeds.
    pub fn load_blocklist(&self) -> Result<Vec<BlockedDomain>> {
        if let Some(list) = self.read_doc(BLOCKLIST)? {
            return Ok(list);
        }
        let seeded: Vec<BlockedDomain> = SEED_BLOCKLIST
            .iter()
            .map(|domain| BlockedDomain {
                id: Uuid::new_v4(),
                domain: (*domain).to_string(),
                reason: SEED_REASON.to_string(),
                added_at: Timestamp::now(),
            })
            .collect();
        self.save_blocklist(&seeded)?;
        Ok(seeded)
    }

    /// Writes the blocklist.
    pub fn save_blocklist(&self, list: &[BlockedDomain]) -> Result<()> {
        self.write_doc(BLOCKLIST, list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("bulwark")).unwrap();
        (dir, storage)
    }

    #[test]
    fn first_load_seeds_and_persists() {
        let (_dir, storage) = test_storage();

        let first = storage.load_blocklist().unwrap();
        assert_eq!(first.len(), SEED_BLOCKLIST.len());
        assert!(first.iter().any(|d| d.domain == "evil-tracker.net"));
        assert!(first.iter().all(|d| d.reason == SEED_REASON));

        // The seed was written out: ids are stable across loads.
        let second = storage.load_blocklist().unwrap();
        assert_eq!(
            first.iter().map(|d| d.id).collect::<Vec<_>>(),
            second.iter().map(|d| d.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn emptied_list_stays_empty() {
        let (_dir, storage) = test_storage();
        storage.load_blocklist().unwrap();
        storage.save_blocklist(&[]).unwrap();

        assert!(storage.load_blocklist().unwrap().is_empty());
    }

    #[test]
    fn added_and_removed_entries_round_trip() {
        let (_dir, storage) = test_storage();
        let mut list = storage.load_blocklist().unwrap();

        let added = BlockedDomain {
            id: Uuid::new_v4(),
            domain: "tracking-pixel.example".to_string(),
            reason: "telemetry".to_string(),
            added_at: Timestamp::now(),
        };
        list.push(added.clone());
        storage.save_blocklist(&list).unwrap();

        let loaded = storage.load_blocklist().unwrap();
        assert_eq!(loaded.len(), SEED_BLOCKLIST.len() + 1);
        assert!(loaded.iter().any(|d| d.id == added.id));

        let trimmed: Vec<BlockedDomain> =
            loaded.into_iter().filter(|d| d.id != added.id).collect();
        storage.save_blocklist(&trimmed).unwrap();

        let reloaded = storage.load_blocklist().unwrap();
        assert_eq!(reloaded.len(), SEED_BLOCKLIST.len());
        assert!(reloaded.iter().all(|d| d.id != added.id));
    }
}
