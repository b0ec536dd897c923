use serde::Serialize;
use std::fmt;
use tracing::info;

use super::containers::{scale_by_container_combo, scale_by_containers, ContainerKind};
use super::engine::{
    scale_by_anchor_ingredient, scale_by_available_ingredients, scale_by_multiplier,
    scale_to_weight, ScaledRecipe,
};
use crate::catalog::{IngredientMap, Recipe};

/// How the operator asked for one recipe to be scaled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScalingDirective {
    TargetWeight { grams: f64 },
    ContainerCount { kind: ContainerKind, count: u32 },
    ContainerCombo { pans: u32, tubs: u32 },
    Multiplier { factor: f64 },
    AnchorIngredient { name: String, available_grams: f64 },
    AvailableIngredients { available: IngredientMap },
}

impl ScalingDirective {
    /// Mix weight the directive aims for, when it is weight based.
    pub fn target_weight(&self, density_g_per_ml: f64) -> Option<f64> {
        match self {
            ScalingDirective::TargetWeight { grams } => Some(*grams),
            ScalingDirective::ContainerCount { kind, count } => {
                Some(scale_by_containers(*kind, *count, density_g_per_ml))
            }
            ScalingDirective::ContainerCombo { pans, tubs } => {
                Some(scale_by_container_combo(*pans, *tubs, density_g_per_ml))
            }
            _ => None,
        }
    }

    pub fn apply(&self, recipe: &Recipe, density_g_per_ml: f64) -> ScaledRecipe {
        let scaled = match self {
            ScalingDirective::Multiplier { factor } => scale_by_multiplier(recipe, *factor),
            ScalingDirective::AnchorIngredient {
                name,
                available_grams,
            } => scale_by_anchor_ingredient(recipe, name, *available_grams),
            ScalingDirective::AvailableIngredients { available } => {
                scale_by_available_ingredients(recipe, available)
            }
            weight_based => {
                let target = weight_based.target_weight(density_g_per_ml).unwrap_or(0.0);
                scale_to_weight(recipe, target)
            }
        };
        info!(
            recipe = %recipe.name,
            directive = %self,
            factor = scaled.scale_factor,
            total_g = scaled.total_weight,
            "Scaled recipe"
        );
        scaled
    }
}

impl fmt::Display for ScalingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingDirective::TargetWeight { grams } => write!(f, "target weight {:.0} g", grams),
            ScalingDirective::ContainerCount { kind, count } => {
                write!(f, "{} x {}", count, kind.label())
            }
            ScalingDirective::ContainerCombo { pans, tubs } => {
                write!(f, "{} pans + {} tubs", pans, tubs)
            }
            ScalingDirective::Multiplier { factor } => write!(f, "multiplier {}", factor),
            ScalingDirective::AnchorIngredient {
                name,
                available_grams,
            } => write!(f, "anchor {} at {:.0} g", name, available_grams),
            ScalingDirective::AvailableIngredients { available } => {
                write!(f, "available amounts for {} ingredients", available.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, NamedMap};
    use crate::scaling::containers::{DEFAULT_MIX_DENSITY_G_PER_ML, PAN_LITERS};

    fn milk_sugar() -> Recipe {
        Recipe {
            name: "base".to_string(),
            ingredients: vec![("milk", 1000.0), ("sugar", 500.0)].into_iter().collect(),
            instructions: Vec::new(),
            subrecipes: NamedMap::new(),
        }
    }

    #[test]
    fn test_target_weight_directive() {
        let scaled = ScalingDirective::TargetWeight { grams: 3000.0 }.apply(&milk_sugar(), 1.0);
        assert_eq!(scaled.scale_factor, 2.0);
        assert_eq!(scaled.ingredients.get("sugar"), Some(&1000.0));
    }

    #[test]
    fn test_container_directive_goes_through_weight() {
        let directive = ScalingDirective::ContainerCount {
            kind: ContainerKind::Pan,
            count: 3,
        };
        let target = directive.target_weight(1.0).unwrap();
        assert!((target - 3.0 * PAN_LITERS * 1000.0).abs() < 1e-9);

        let scaled = directive.apply(&milk_sugar(), 1.0);
        assert!((scaled.scale_factor - 10.0).abs() < 1e-12);
        assert_eq!(scaled.ingredients.get("milk"), Some(&10000.0));
    }

    #[test]
    fn test_combo_with_nothing_falls_back() {
        let directive = ScalingDirective::ContainerCombo { pans: 0, tubs: 0 };
        let scaled = directive.apply(&milk_sugar(), DEFAULT_MIX_DENSITY_G_PER_ML);
        assert_eq!(scaled.scale_factor, 1.0);
        assert!(scaled.warning.is_some());
    }

    #[test]
    fn test_non_weight_directives_have_no_target() {
        let directive = ScalingDirective::Multiplier { factor: 2.0 };
        assert_eq!(directive.target_weight(1.0), None);
        let scaled = directive.apply(&milk_sugar(), 1.0);
        assert_eq!(scaled.total_weight, 3000.0);
    }

    #[test]
    fn test_anchor_directive_on_builtin_recipe() {
        let catalog = Catalog::builtin().unwrap();
        let vanilla = catalog.get("vanilla").unwrap();
        let directive = ScalingDirective::AnchorIngredient {
            name: "cream".to_string(),
            available_grams: 5000.0,
        };
        let scaled = directive.apply(vanilla, DEFAULT_MIX_DENSITY_G_PER_ML);
        assert_eq!(scaled.scale_factor, 0.5);
        assert_eq!(scaled.ingredients.get("cream"), Some(&5000.0));
        assert_eq!(scaled.ingredients.get("milk"), Some(&14255.0));
    }

    #[test]
    fn test_directive_display() {
        let directive = ScalingDirective::ContainerCount {
            kind: ContainerKind::Tub,
            count: 4,
        };
        assert_eq!(directive.to_string(), "4 x 1.5 gallon tub");
    }
}
