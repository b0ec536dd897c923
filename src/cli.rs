use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::catalog::IngredientMap;
use crate::error::{parse_grams, KitchenError, Result};
use crate::scaling::{ContainerKind, ScalingDirective};

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch scaling and stock tracking for the production kitchen", long_about = None)]
pub struct Cli {
    /// Directory holding the inventory, threshold and lineup records
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Recipe catalog JSON file (defaults to the built-in recipes)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Mix density in g/mL used for container conversions
    #[arg(long, global = true)]
    pub density: Option<f64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List recipes (this week's lineup when one is set)
    Recipes {
        /// Ignore the weekly lineup
        #[arg(long)]
        all: bool,
    },

    /// Print a recipe as written
    Show { recipe: String },

    /// Scale a recipe and print the batch sheet
    Scale {
        recipe: String,

        #[command(flatten)]
        scale: ScaleArgs,

        #[arg(long, value_enum, default_value_t = SheetFormat::Text)]
        format: SheetFormat,
    },

    /// Scale a recipe, then weigh it one ingredient at a time
    Weigh {
        recipe: String,

        #[command(flatten)]
        scale: ScaleArgs,
    },

    /// Raw ingredient stock on hand
    Inventory {
        #[command(subcommand)]
        action: StockAction,
    },

    /// Minimum stock levels
    Thresholds {
        #[command(subcommand)]
        action: StockAction,
    },

    /// Hide an ingredient from stock views and reorder checks
    Exclude { ingredient: String },

    /// Stop hiding an ingredient
    Include { ingredient: String },

    /// Ingredients below their minimum
    Reorder,

    /// This week's flavors
    Lineup {
        #[command(subcommand)]
        action: LineupAction,
    },

    /// Finished flavor quarts on hand
    Flavors {
        #[command(subcommand)]
        action: FlavorAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum StockAction {
    /// List tracked ingredients
    List {
        /// Only names containing this text
        #[arg(long, default_value = "")]
        filter: String,

        /// Include excluded ingredients
        #[arg(long)]
        show_excluded: bool,
    },

    /// Set the quantity for one ingredient
    Set {
        ingredient: String,
        amount: String,

        #[arg(long, default_value = "g")]
        unit: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LineupAction {
    Show,
    /// Replace the lineup; flavor stock for dropped flavors is removed
    Set {
        #[arg(required = true)]
        flavors: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FlavorAction {
    List,
    Set { flavor: String, quarts: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Text,
    Csv,
    Json,
}

/// Scaling options. Exactly one way of scaling must be given.
#[derive(Args, Debug, Clone, Default)]
pub struct ScaleArgs {
    /// Target total weight in grams
    #[arg(long)]
    pub weight: Option<String>,

    /// Number of 5 liter pans
    #[arg(long)]
    pub pans: Option<u32>,

    /// Number of 1.5 gallon tubs
    #[arg(long)]
    pub tubs: Option<u32>,

    /// Multiply every quantity
    #[arg(long)]
    pub multiplier: Option<String>,

    /// Ingredient to scale around
    #[arg(long, requires = "available")]
    pub anchor: Option<String>,

    /// Grams available of the anchor ingredient
    #[arg(long, requires = "anchor")]
    pub available: Option<String>,

    /// Grams on hand of an ingredient; blank means fully stocked
    #[arg(long = "have", value_name = "INGREDIENT=GRAMS")]
    pub have: Vec<String>,
}

impl ScaleArgs {
    pub fn to_directive(&self) -> Result<ScalingDirective> {
        let mut directives = Vec::new();

        if let Some(text) = &self.weight {
            directives.push(ScalingDirective::TargetWeight {
                grams: parse_grams("target weight", text)?,
            });
        }
        match (self.pans, self.tubs) {
            (Some(pans), Some(tubs)) => directives.push(ScalingDirective::ContainerCombo { pans, tubs }),
            (Some(count), None) => directives.push(ScalingDirective::ContainerCount {
                kind: ContainerKind::Pan,
                count,
            }),
            (None, Some(count)) => directives.push(ScalingDirective::ContainerCount {
                kind: ContainerKind::Tub,
                count,
            }),
            (None, None) => {}
        }
        if let Some(text) = &self.multiplier {
            directives.push(ScalingDirective::Multiplier {
                factor: parse_grams("multiplier", text)?,
            });
        }
        if let (Some(name), Some(text)) = (&self.anchor, &self.available) {
            directives.push(ScalingDirective::AnchorIngredient {
                name: name.clone(),
                available_grams: parse_grams(name, text)?,
            });
        }
        if !self.have.is_empty() {
            directives.push(ScalingDirective::AvailableIngredients {
                available: parse_available(&self.have)?,
            });
        }

        if directives.len() > 1 {
            return Err(KitchenError::InvalidDirective(
                "choose only one way to scale".to_string(),
            ));
        }
        directives.pop().ok_or_else(|| {
            KitchenError::InvalidDirective(
                "give --weight, --pans/--tubs, --multiplier, --anchor/--available or --have"
                    .to_string(),
            )
        })
    }
}

fn parse_available(entries: &[String]) -> Result<IngredientMap> {
    let mut available = IngredientMap::new();
    for entry in entries {
        let (name, amount) = entry.split_once('=').ok_or_else(|| {
            KitchenError::InvalidDirective(format!("expected INGREDIENT=GRAMS, got '{}'", entry))
        })?;
        let name = name.trim();
        if amount.trim().is_empty() {
            continue;
        }
        available.insert(name, parse_grams(name, amount)?);
    }
    Ok(available)
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
