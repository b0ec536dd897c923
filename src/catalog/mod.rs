//! Recipe catalog: read-only reference data loaded once at startup.

pub mod named_map;

pub use named_map::NamedMap;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

use crate::error::{KitchenError, Result};

/// Ingredient name → grams, in weighing order.
pub type IngredientMap = NamedMap<f64>;

const BUILTIN_CATALOG: &str = include_str!("builtin_recipes.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRecipe {
    pub ingredients: IngredientMap,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    #[serde(skip)]
    pub name: String,
    pub ingredients: IngredientMap,
    pub instructions: Vec<String>,
    pub subrecipes: NamedMap<SubRecipe>,
}

// Full recipe shape. Unknown keys are refused so that a flat legacy
// mapping never parses as a structured recipe with defaulted fields.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RecipeBody {
    ingredients: IngredientMap,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    subrecipes: NamedMap<SubRecipe>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeEntry {
    Structured(RecipeBody),
    /// Oldest catalog schema: a bare ingredient → grams mapping.
    Flat(IngredientMap),
}

impl RecipeEntry {
    fn into_recipe(self, name: String) -> Recipe {
        match self {
            RecipeEntry::Structured(body) => Recipe {
                name,
                ingredients: body.ingredients,
                instructions: body.instructions,
                subrecipes: body.subrecipes,
            },
            RecipeEntry::Flat(ingredients) => Recipe {
                name,
                ingredients,
                instructions: Vec::new(),
                subrecipes: NamedMap::new(),
            },
        }
    }
}

impl Recipe {
    /// Every ingredient name used by the recipe or any of its sub-recipes.
    pub fn all_ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .keys()
            .chain(self.subrecipes.values().flat_map(|sub| sub.ingredients.keys()))
    }

    fn validate(&self) -> Result<()> {
        let check = |section: &str, ingredients: &IngredientMap| -> Result<()> {
            for (ingredient, grams) in ingredients.iter() {
                if !grams.is_finite() || *grams < 0.0 {
                    return Err(KitchenError::InvalidCatalog(format!(
                        "'{}' in {} has quantity {}",
                        ingredient, section, grams
                    )));
                }
            }
            Ok(())
        };
        check(&self.name, &self.ingredients)?;
        for (sub_name, sub) in self.subrecipes.iter() {
            check(&format!("{} / {}", self.name, sub_name), &sub.ingredients)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: NamedMap<Recipe>,
}

impl Catalog {
    /// The house recipes compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let entries: NamedMap<RecipeEntry> = serde_json::from_str(text)?;
        let mut recipes = NamedMap::new();
        for (name, entry) in entries {
            let recipe = entry.into_recipe(name.clone());
            recipe.validate()?;
            recipes.insert(name, recipe);
        }
        Ok(Self { recipes })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json(&text)?;
        info!(path = %path.display(), recipes = catalog.len(), "Loaded recipe catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&Recipe> {
        self.recipes
            .get(name)
            .ok_or_else(|| KitchenError::UnknownRecipe(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Recipe names offered in the picker: the weekly lineup members in
    /// catalog order, or the whole catalog when no lineup is set.
    pub fn picker_names<'a>(&'a self, lineup: &[String]) -> Vec<&'a str> {
        if lineup.is_empty() {
            return self.names().collect();
        }
        self.names()
            .filter(|name| lineup.iter().any(|member| member == name))
            .collect()
    }

    /// Union of every ingredient key across recipes and sub-recipes.
    pub fn known_ingredients(&self) -> BTreeSet<String> {
        self.recipes
            .values()
            .flat_map(|recipe| recipe.all_ingredient_names())
            .map(str::to_string)
            .collect()
    }
}
