//! Persisted inventory-side records and their on-disk schemas.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::units::DEFAULT_UNIT;

/// One persisted JSON document per record kind.
pub trait RecordKind: Serialize + Default + Sized {
    const FILE_NAME: &'static str;

    /// Parses file content, returning the record and whether a legacy
    /// shape had to be upgraded.
    fn parse(text: &str) -> serde_json::Result<(Self, bool)>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub minimum: f64,
    pub unit: String,
}

// Older files stored bare quantities in grams.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredStock {
    Level(StockLevel),
    Bare(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredThreshold {
    Threshold(Threshold),
    Bare(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IngredientInventory(pub BTreeMap<String, StockLevel>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IngredientThresholds(pub BTreeMap<String, Threshold>);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(pub BTreeSet<String>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeeklyLineup(Vec<String>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlavorStock {
    pub quarts: f64,
    #[serde(rename = "lastUpdated", with = "minute_timestamp")]
    pub last_updated: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlavorInventory(pub BTreeMap<String, FlavorStock>);

mod minute_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, FORMAT).map_err(serde::de::Error::custom)
    }
}

impl IngredientInventory {
    pub fn get(&self, ingredient: &str) -> Option<&StockLevel> {
        self.0.get(ingredient)
    }

    pub fn set(&mut self, ingredient: &str, amount: f64, unit: &str) {
        self.0.insert(
            ingredient.to_string(),
            StockLevel {
                amount,
                unit: unit.to_string(),
            },
        );
    }

    /// Adds a zero entry for every known ingredient not yet tracked.
    pub fn seed_known<'a>(&mut self, known: impl IntoIterator<Item = &'a String>) {
        for ingredient in known {
            self.0.entry(ingredient.clone()).or_insert_with(|| StockLevel {
                amount: 0.0,
                unit: DEFAULT_UNIT.to_string(),
            });
        }
    }

    /// Entries not excluded whose name contains `filter` (case-insensitive).
    pub fn visible<'a>(
        &'a self,
        exclusions: &'a ExclusionSet,
        filter: &str,
    ) -> impl Iterator<Item = (&'a String, &'a StockLevel)> + 'a {
        let needle = filter.to_lowercase();
        self.0
            .iter()
            .filter(move |(name, _)| !exclusions.contains(name) && name.to_lowercase().contains(&needle))
    }
}

impl IngredientThresholds {
    pub fn get(&self, ingredient: &str) -> Option<&Threshold> {
        self.0.get(ingredient)
    }

    pub fn set(&mut self, ingredient: &str, minimum: f64, unit: &str) {
        self.0.insert(
            ingredient.to_string(),
            Threshold {
                minimum,
                unit: unit.to_string(),
            },
        );
    }

    pub fn seed_known<'a>(&mut self, known: impl IntoIterator<Item = &'a String>) {
        for ingredient in known {
            self.0.entry(ingredient.clone()).or_insert_with(|| Threshold {
                minimum: 0.0,
                unit: DEFAULT_UNIT.to_string(),
            });
        }
    }

    pub fn visible<'a>(
        &'a self,
        exclusions: &'a ExclusionSet,
        filter: &str,
    ) -> impl Iterator<Item = (&'a String, &'a Threshold)> + 'a {
        let needle = filter.to_lowercase();
        self.0
            .iter()
            .filter(move |(name, _)| !exclusions.contains(name) && name.to_lowercase().contains(&needle))
    }
}

impl ExclusionSet {
    pub fn contains(&self, ingredient: &str) -> bool {
        self.0.contains(ingredient)
    }

    /// Returns `true` if the ingredient was not already excluded.
    pub fn exclude(&mut self, ingredient: &str) -> bool {
        self.0.insert(ingredient.to_string())
    }

    /// Returns `true` if the ingredient was excluded.
    pub fn include(&mut self, ingredient: &str) -> bool {
        self.0.remove(ingredient)
    }
}

impl WeeklyLineup {
    /// Keeps first occurrence order and drops blank or repeated names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut flavors: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !flavors.contains(&name) {
                flavors.push(name);
            }
        }
        Self(flavors)
    }

    pub fn flavors(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, flavor: &str) -> bool {
        self.0.iter().any(|name| name == flavor)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FlavorInventory {
    pub fn set_quarts(&mut self, flavor: &str, quarts: f64, now: NaiveDateTime) {
        self.0.insert(
            flavor.to_string(),
            FlavorStock {
                quarts,
                last_updated: now,
            },
        );
    }

    pub fn get(&self, flavor: &str) -> Option<&FlavorStock> {
        self.0.get(flavor)
    }

    /// Drops flavors no longer in the lineup. Returns how many were removed.
    pub fn prune_to_lineup(&mut self, lineup: &WeeklyLineup) -> usize {
        let before = self.0.len();
        self.0.retain(|flavor, _| lineup.contains(flavor));
        before - self.0.len()
    }
}

impl RecordKind for IngredientInventory {
    const FILE_NAME: &'static str = "ingredient_inventory.json";

    fn parse(text: &str) -> serde_json::Result<(Self, bool)> {
        let stored: BTreeMap<String, StoredStock> = serde_json::from_str(text)?;
        let mut migrated = false;
        let record = stored
            .into_iter()
            .map(|(name, value)| {
                let level = match value {
                    StoredStock::Level(level) => level,
                    StoredStock::Bare(amount) => {
                        migrated = true;
                        StockLevel {
                            amount,
                            unit: DEFAULT_UNIT.to_string(),
                        }
                    }
                };
                (name, level)
            })
            .collect();
        Ok((Self(record), migrated))
    }
}

impl RecordKind for IngredientThresholds {
    const FILE_NAME: &'static str = "ingredient_thresholds.json";

    fn parse(text: &str) -> serde_json::Result<(Self, bool)> {
        let stored: BTreeMap<String, StoredThreshold> = serde_json::from_str(text)?;
        let mut migrated = false;
        let record = stored
            .into_iter()
            .map(|(name, value)| {
                let threshold = match value {
                    StoredThreshold::Threshold(threshold) => threshold,
                    StoredThreshold::Bare(minimum) => {
                        migrated = true;
                        Threshold {
                            minimum,
                            unit: DEFAULT_UNIT.to_string(),
                        }
                    }
                };
                (name, threshold)
            })
            .collect();
        Ok((Self(record), migrated))
    }
}

impl RecordKind for ExclusionSet {
    const FILE_NAME: &'static str = "excluded_ingredients.json";

    fn parse(text: &str) -> serde_json::Result<(Self, bool)> {
        Ok((serde_json::from_str(text)?, false))
    }
}

impl RecordKind for WeeklyLineup {
    const FILE_NAME: &'static str = "weekly_lineup.json";

    fn parse(text: &str) -> serde_json::Result<(Self, bool)> {
        let names: Vec<String> = serde_json::from_str(text)?;
        Ok((Self::new(names), false))
    }
}

impl RecordKind for FlavorInventory {
    const FILE_NAME: &'static str = "flavor_inventory.json";

    fn parse(text: &str) -> serde_json::Result<(Self, bool)> {
        Ok((serde_json::from_str(text)?, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 25)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    }

    #[test]
    fn test_bare_numbers_are_migrated() {
        let (inventory, migrated) =
            IngredientInventory::parse(r#"{"sugar": 1200, "milk": {"amount": 3, "unit": "gal"}}"#).unwrap();
        assert!(migrated);
        assert_eq!(
            inventory.get("sugar"),
            Some(&StockLevel { amount: 1200.0, unit: "g".to_string() })
        );
        assert_eq!(inventory.get("milk").unwrap().unit, "gal");

        let (_, migrated) = IngredientInventory::parse(r#"{"milk": {"amount": 3, "unit": "gal"}}"#).unwrap();
        assert!(!migrated);
    }

    #[test]
    fn test_threshold_migration() {
        let (thresholds, migrated) = IngredientThresholds::parse(r#"{"guar": 50}"#).unwrap();
        assert!(migrated);
        assert_eq!(thresholds.get("guar").unwrap().minimum, 50.0);
        assert_eq!(thresholds.get("guar").unwrap().unit, "g");
    }

    #[test]
    fn test_seed_known_keeps_existing_amounts() {
        let mut inventory = IngredientInventory::default();
        inventory.set("milk", 10.0, "gal");
        let known: BTreeSet<String> = ["milk", "sugar"].iter().map(|s| s.to_string()).collect();
        inventory.seed_known(&known);
        assert_eq!(inventory.get("milk").unwrap().amount, 10.0);
        assert_eq!(inventory.get("sugar"), Some(&StockLevel { amount: 0.0, unit: "g".to_string() }));
    }

    #[test]
    fn test_visible_hides_exclusions_and_filters() {
        let mut inventory = IngredientInventory::default();
        inventory.set("dry milk", 1.0, "kg");
        inventory.set("milk", 1.0, "gal");
        inventory.set("sugar", 1.0, "kg");
        let mut exclusions = ExclusionSet::default();
        exclusions.exclude("dry milk");

        let names: Vec<&String> = inventory.visible(&exclusions, "MILK").map(|(n, _)| n).collect();
        assert_eq!(names, vec!["milk"]);
        assert_eq!(inventory.visible(&exclusions, "").count(), 2);
    }

    #[test]
    fn test_exclusion_set_roundtrips_as_list() {
        let mut exclusions = ExclusionSet::default();
        assert!(exclusions.exclude("salt"));
        assert!(!exclusions.exclude("salt"));
        assert_eq!(serde_json::to_string(&exclusions).unwrap(), r#"["salt"]"#);
        assert!(exclusions.include("salt"));
        assert!(!exclusions.contains("salt"));
    }

    #[test]
    fn test_lineup_dedups_in_order() {
        let lineup = WeeklyLineup::new(vec!["vanilla", " Creme Brulee ", "vanilla", ""]);
        assert_eq!(lineup.flavors(), &["vanilla".to_string(), "Creme Brulee".to_string()]);
    }

    #[test]
    fn test_flavor_timestamp_format() {
        let mut flavors = FlavorInventory::default();
        flavors.set_quarts("vanilla", 12.5, noon());
        let json = serde_json::to_string(&flavors).unwrap();
        assert_eq!(json, r#"{"vanilla":{"quarts":12.5,"lastUpdated":"2025-07-25 12:30"}}"#);

        let (parsed, _) = FlavorInventory::parse(&json).unwrap();
        let stock = parsed.get("vanilla").unwrap();
        assert_eq!(stock.last_updated.format("%H:%M").to_string(), "12:30");
    }

    #[test]
    fn test_prune_to_lineup() {
        let mut flavors = FlavorInventory::default();
        flavors.set_quarts("vanilla", 4.0, noon());
        flavors.set_quarts("Dulce de Leche", 2.0, noon());
        flavors.set_quarts("Creme Brulee", 1.0, noon());
        let lineup = WeeklyLineup::new(vec!["vanilla", "Key Lime Pie"]);
        assert_eq!(flavors.prune_to_lineup(&lineup), 2);
        assert!(flavors.get("vanilla").is_some());
        assert!(flavors.get("Creme Brulee").is_none());
    }
}
