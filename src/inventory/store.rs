//! Whole-file JSON persistence for the inventory records.
//!
//! Loads never fail: an absent or unreadable document becomes the record's
//! default. Saves overwrite the whole document.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::records::{
    FlavorInventory, IngredientInventory, IngredientThresholds, RecordKind, WeeklyLineup,
};
use crate::catalog::Catalog;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for<R: RecordKind>(&self) -> PathBuf {
        self.dir.join(R::FILE_NAME)
    }

    pub async fn load<R: RecordKind>(&self) -> R {
        let path = self.path_for::<R>();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return R::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read record, using defaults");
                return R::default();
            }
        };
        match R::parse(&text) {
            Ok((record, false)) => record,
            Ok((record, true)) => {
                info!(path = %path.display(), "Upgraded legacy record schema");
                if let Err(e) = self.save(&record).await {
                    warn!(path = %path.display(), error = %e, "Could not persist upgraded record");
                }
                record
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt record, using defaults");
                R::default()
            }
        }
    }

    pub async fn save<R: RecordKind>(&self, record: &R) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for::<R>();
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, json).await?;
        info!(path = %path.display(), "Saved record");
        Ok(())
    }

    /// Inventory with a zero entry for every ingredient the catalog uses.
    pub async fn load_inventory(&self, catalog: &Catalog) -> IngredientInventory {
        let mut inventory: IngredientInventory = self.load().await;
        inventory.seed_known(&catalog.known_ingredients());
        inventory
    }

    pub async fn load_thresholds(&self, catalog: &Catalog) -> IngredientThresholds {
        let mut thresholds: IngredientThresholds = self.load().await;
        thresholds.seed_known(&catalog.known_ingredients());
        thresholds
    }

    /// Saves the lineup and drops flavor inventory for flavors that left it.
    /// Returns how many flavor entries were pruned.
    pub async fn save_lineup(&self, lineup: &WeeklyLineup) -> Result<usize> {
        self.save(lineup).await?;
        let mut flavors: FlavorInventory = self.load().await;
        let pruned = flavors.prune_to_lineup(lineup);
        if pruned > 0 {
            self.save(&flavors).await?;
            info!(pruned, "Pruned flavor inventory to the new lineup");
        }
        Ok(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::records::ExclusionSet;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_absent_record_is_default() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let exclusions: ExclusionSet = store.load().await;
        assert_eq!(exclusions, ExclusionSet::default());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_default() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(store.path_for::<WeeklyLineup>(), "{not json").unwrap();
        let lineup: WeeklyLineup = store.load().await;
        assert!(lineup.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("nested"));
        let mut exclusions = ExclusionSet::default();
        exclusions.exclude("vanilla seeds");
        store.save(&exclusions).await.unwrap();
        let loaded: ExclusionSet = store.load().await;
        assert!(loaded.contains("vanilla seeds"));
    }

    #[tokio::test]
    async fn test_legacy_inventory_upgraded_on_disk() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let path = store.path_for::<IngredientInventory>();
        std::fs::write(&path, r#"{"sugar": 1500}"#).unwrap();

        let inventory: IngredientInventory = store.load().await;
        assert_eq!(inventory.get("sugar").unwrap().unit, "g");

        let on_disk: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["sugar"]["amount"], 1500.0);
        assert_eq!(on_disk["sugar"]["unit"], "g");
    }

    #[tokio::test]
    async fn test_inventory_seeded_from_catalog() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let catalog = Catalog::builtin().unwrap();
        let inventory = store.load_inventory(&catalog).await;
        assert_eq!(inventory.0.len(), catalog.known_ingredients().len());
        assert_eq!(inventory.get("guar").unwrap().amount, 0.0);
        // seeding alone writes nothing
        assert!(!store.path_for::<IngredientInventory>().exists());
    }

    #[tokio::test]
    async fn test_save_lineup_prunes_flavors() {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let stamp = NaiveDate::from_ymd_opt(2025, 7, 25).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut flavors = FlavorInventory::default();
        flavors.set_quarts("vanilla", 6.0, stamp);
        flavors.set_quarts("Dulce de Leche", 3.0, stamp);
        store.save(&flavors).await.unwrap();

        let pruned = store.save_lineup(&WeeklyLineup::new(vec!["vanilla"])).await.unwrap();
        assert_eq!(pruned, 1);
        let flavors: FlavorInventory = store.load().await;
        assert!(flavors.get("Dulce de Leche").is_none());
        assert_eq!(flavors.get("vanilla").unwrap().quarts, 6.0);

        let lineup: WeeklyLineup = store.load().await;
        assert_eq!(lineup.flavors(), &["vanilla".to_string()]);
    }
}
