use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::warn;

use super::records::{ExclusionSet, IngredientInventory, IngredientThresholds};
use crate::units::comparable_amounts;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderAlert {
    pub amount: f64,
    pub amount_unit: String,
    pub minimum: f64,
    pub minimum_unit: String,
}

impl fmt::Display for ReorderAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on hand, minimum {} {}",
            self.amount, self.amount_unit, self.minimum, self.minimum_unit
        )
    }
}

/// Ingredients whose on-hand amount is below their minimum.
///
/// Only ingredients present in both records and not excluded are checked.
/// Both sides are normalized to a common base unit first; pairs whose units
/// cannot be compared are skipped.
pub fn needs_reorder(
    inventory: &IngredientInventory,
    thresholds: &IngredientThresholds,
    exclusions: &ExclusionSet,
) -> BTreeMap<String, ReorderAlert> {
    let mut alerts = BTreeMap::new();
    for (name, stock) in &inventory.0 {
        if exclusions.contains(name) {
            continue;
        }
        let Some(threshold) = thresholds.get(name) else {
            continue;
        };
        let Some((on_hand, minimum)) =
            comparable_amounts(stock.amount, &stock.unit, threshold.minimum, &threshold.unit)
        else {
            warn!(
                ingredient = %name,
                stock_unit = %stock.unit,
                threshold_unit = %threshold.unit,
                "Skipping reorder check, units are not comparable"
            );
            continue;
        };
        if on_hand < minimum {
            alerts.insert(
                name.clone(),
                ReorderAlert {
                    amount: stock.amount,
                    amount_unit: stock.unit.clone(),
                    minimum: threshold.minimum,
                    minimum_unit: threshold.unit.clone(),
                },
            );
        }
    }
    alerts
}

/// Same as [`needs_reorder`], ignoring ingredients no recipe uses anymore.
pub fn needs_reorder_known(
    inventory: &IngredientInventory,
    thresholds: &IngredientThresholds,
    exclusions: &ExclusionSet,
    known: &BTreeSet<String>,
) -> BTreeMap<String, ReorderAlert> {
    let mut alerts = needs_reorder(inventory, thresholds, exclusions);
    alerts.retain(|name, _| known.contains(name));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sugar_low() -> (IngredientInventory, IngredientThresholds) {
        let mut inventory = IngredientInventory::default();
        inventory.set("sugar", 10.0, "g");
        let mut thresholds = IngredientThresholds::default();
        thresholds.set("sugar", 50.0, "g");
        (inventory, thresholds)
    }

    #[test]
    fn test_low_stock_flagged_until_excluded() {
        let (inventory, thresholds) = sugar_low();
        let mut exclusions = ExclusionSet::default();
        let alerts = needs_reorder(&inventory, &thresholds, &exclusions);
        assert!(alerts.contains_key("sugar"));
        assert_eq!(alerts["sugar"].to_string(), "10 g on hand, minimum 50 g");

        exclusions.exclude("sugar");
        assert!(needs_reorder(&inventory, &thresholds, &exclusions).is_empty());
    }

    #[test]
    fn test_at_minimum_is_not_flagged() {
        let (mut inventory, thresholds) = sugar_low();
        inventory.set("sugar", 50.0, "g");
        assert!(needs_reorder(&inventory, &thresholds, &ExclusionSet::default()).is_empty());
    }

    #[test]
    fn test_units_normalized_before_comparing() {
        let mut inventory = IngredientInventory::default();
        inventory.set("sugar", 2.0, "kg");
        inventory.set("cream", 1.0, "gal");
        let mut thresholds = IngredientThresholds::default();
        thresholds.set("sugar", 500.0, "g");
        thresholds.set("cream", 2.0, "l");
        let alerts = needs_reorder(&inventory, &thresholds, &ExclusionSet::default());
        // 2 kg is above 500 g, 1 gal (3.79 l) is above 2 l
        assert!(alerts.is_empty());

        thresholds.set("sugar", 5.0, "lb");
        let alerts = needs_reorder(&inventory, &thresholds, &ExclusionSet::default());
        assert!(alerts.contains_key("sugar"));
    }

    #[test]
    fn test_incomparable_units_skipped() {
        let mut inventory = IngredientInventory::default();
        inventory.set("eggs", 1.0, "case");
        let mut thresholds = IngredientThresholds::default();
        thresholds.set("eggs", 500.0, "g");
        assert!(needs_reorder(&inventory, &thresholds, &ExclusionSet::default()).is_empty());
    }

    #[test]
    fn test_missing_threshold_ignored() {
        let (inventory, _) = sugar_low();
        assert!(needs_reorder(&inventory, &IngredientThresholds::default(), &ExclusionSet::default()).is_empty());
    }

    #[test]
    fn test_unknown_ingredients_dropped() {
        let (inventory, thresholds) = sugar_low();
        let known: BTreeSet<String> = ["milk".to_string()].into_iter().collect();
        assert!(needs_reorder_known(&inventory, &thresholds, &ExclusionSet::default(), &known).is_empty());
    }
}
