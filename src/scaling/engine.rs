use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::catalog::{IngredientMap, NamedMap, Recipe, SubRecipe};

/// Why a scaling request fell back to a factor of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleWarning {
    NonPositiveTarget,
    NonPositiveFactor,
    ZeroTotalWeight,
    AnchorMissing,
    AnchorZero,
    NoMatchingAvailable,
}

impl fmt::Display for ScaleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            ScaleWarning::NonPositiveTarget => "target weight must be greater than zero",
            ScaleWarning::NonPositiveFactor => "multiplier must be greater than zero",
            ScaleWarning::ZeroTotalWeight => "recipe has no weight to scale from",
            ScaleWarning::AnchorMissing => "anchor ingredient is not part of the recipe",
            ScaleWarning::AnchorZero => "anchor ingredient has no base quantity",
            ScaleWarning::NoMatchingAvailable => "no available amounts match the recipe",
        };
        write!(f, "{} (using scale factor 1)", message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe {
    pub recipe_name: String,
    pub ingredients: IngredientMap,
    pub instructions: Vec<String>,
    pub subrecipes: NamedMap<SubRecipe>,
    pub scale_factor: f64,
    /// Sum of the rounded top-level quantities.
    pub total_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ScaleWarning>,
}

/// Sum of the top-level ingredient quantities. Sub-recipes are excluded.
pub fn total_weight(recipe: &Recipe) -> f64 {
    recipe.ingredients.values().sum()
}

fn scale_ingredients(ingredients: &IngredientMap, factor: f64) -> IngredientMap {
    ingredients.map_values(|grams| (grams * factor).round())
}

fn apply_factor(recipe: &Recipe, factor: f64, warning: Option<ScaleWarning>) -> ScaledRecipe {
    if let Some(reason) = warning {
        warn!(recipe = %recipe.name, %reason, "Scaling fell back to the base recipe");
    }
    let ingredients = scale_ingredients(&recipe.ingredients, factor);
    let subrecipes = recipe.subrecipes.map_values(|sub| SubRecipe {
        ingredients: scale_ingredients(&sub.ingredients, factor),
        instructions: sub.instructions.clone(),
    });
    let total_weight = ingredients.values().sum();
    ScaledRecipe {
        recipe_name: recipe.name.clone(),
        ingredients,
        instructions: recipe.instructions.clone(),
        subrecipes,
        scale_factor: factor,
        total_weight,
        warning,
    }
}

pub fn scale_to_weight(recipe: &Recipe, target_grams: f64) -> ScaledRecipe {
    if !(target_grams.is_finite() && target_grams > 0.0) {
        return apply_factor(recipe, 1.0, Some(ScaleWarning::NonPositiveTarget));
    }
    let base = total_weight(recipe);
    if base <= 0.0 {
        return apply_factor(recipe, 1.0, Some(ScaleWarning::ZeroTotalWeight));
    }
    apply_factor(recipe, target_grams / base, None)
}

pub fn scale_by_multiplier(recipe: &Recipe, factor: f64) -> ScaledRecipe {
    if !(factor.is_finite() && factor > 0.0) {
        return apply_factor(recipe, 1.0, Some(ScaleWarning::NonPositiveFactor));
    }
    apply_factor(recipe, factor, None)
}

/// Scales so that `ingredient` uses exactly `available_grams`.
pub fn scale_by_anchor_ingredient(
    recipe: &Recipe,
    ingredient: &str,
    available_grams: f64,
) -> ScaledRecipe {
    match recipe.ingredients.get(ingredient) {
        None => apply_factor(recipe, 1.0, Some(ScaleWarning::AnchorMissing)),
        Some(base) if *base <= 0.0 => apply_factor(recipe, 1.0, Some(ScaleWarning::AnchorZero)),
        Some(base) => apply_factor(recipe, available_grams / base, None),
    }
}

/// Scales down to whatever the scarcest listed ingredient allows.
///
/// Ingredients missing from `available` are treated as fully stocked and do
/// not constrain the factor. Sub-recipes are scaled like every other mode.
pub fn scale_by_available_ingredients(recipe: &Recipe, available: &IngredientMap) -> ScaledRecipe {
    let factor = available
        .iter()
        .filter_map(|(name, amount)| match recipe.ingredients.get(name) {
            Some(base) if *base != 0.0 => Some(amount / base),
            _ => None,
        })
        .fold(None, |lowest: Option<f64>, ratio| {
            Some(lowest.map_or(ratio, |low| low.min(ratio)))
        });
    match factor {
        Some(factor) => apply_factor(recipe, factor, None),
        None => apply_factor(recipe, 1.0, Some(ScaleWarning::NoMatchingAvailable)),
    }
}
