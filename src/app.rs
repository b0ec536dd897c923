//! Command handlers behind the `kitchen-batch` binary.

use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::batch_sheet::{render_text, write_csv};
use crate::catalog::Catalog;
use crate::cli::{Command, FlavorAction, LineupAction, SheetFormat, StockAction};
use crate::config::AppConfig;
use crate::error::{parse_grams, KitchenError};
use crate::inventory::{
    needs_reorder_known, ExclusionSet, FlavorInventory, RecordStore, WeeklyLineup,
};
use crate::scaling::{engine::scale_by_multiplier, CursorState, ScalingDirective};
use crate::session::ScalingSession;

pub struct App {
    config: AppConfig,
    catalog: Catalog,
    store: RecordStore,
}

impl App {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog = config
            .load_catalog()
            .await
            .with_context(|| format!("Failed to load recipe catalog {:?}", config.catalog_path))?;
        let store = config.store();
        info!(recipes = catalog.len(), data_dir = %store.dir().display(), "Kitchen data ready");
        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs every command except the interactive weighing walk.
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Recipes { all } => self.list_recipes(all, out).await,
            Command::Show { recipe } => {
                let recipe = self.catalog.get(&recipe)?;
                write!(out, "{}", render_text(&scale_by_multiplier(recipe, 1.0)))?;
                Ok(())
            }
            Command::Scale {
                recipe,
                scale,
                format,
            } => {
                let directive = scale.to_directive()?;
                self.scale(&recipe, directive, format, out)
            }
            Command::Weigh { recipe, scale } => {
                let directive = scale.to_directive()?;
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                self.weigh(&recipe, directive, stdin, out).await
            }
            Command::Inventory { action } => self.inventory(action, out).await,
            Command::Thresholds { action } => self.thresholds(action, out).await,
            Command::Exclude { ingredient } => self.set_excluded(&ingredient, true, out).await,
            Command::Include { ingredient } => self.set_excluded(&ingredient, false, out).await,
            Command::Reorder => self.reorder(out).await,
            Command::Lineup { action } => self.lineup(action, out).await,
            Command::Flavors { action } => self.flavors(action, out).await,
        }
    }

    async fn list_recipes<W: Write>(&self, all: bool, out: &mut W) -> Result<()> {
        let lineup: WeeklyLineup = if all {
            WeeklyLineup::default()
        } else {
            self.store.load().await
        };
        for name in self.catalog.picker_names(lineup.flavors()) {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }

    pub fn scale<W: Write>(
        &self,
        recipe: &str,
        directive: ScalingDirective,
        format: SheetFormat,
        out: &mut W,
    ) -> Result<()> {
        let recipe = self.catalog.get(recipe)?;
        let scaled = directive.apply(recipe, self.config.density_g_per_ml);
        match format {
            SheetFormat::Text => write!(out, "{}", render_text(&scaled))?,
            SheetFormat::Csv => write_csv(&scaled, &mut *out)?,
            SheetFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&scaled)?)?,
        }
        Ok(())
    }

    /// Interactive walk: Enter/n next, b back, r restart, q quit.
    pub async fn weigh<R, W>(
        &self,
        recipe: &str,
        directive: ScalingDirective,
        input: R,
        out: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let recipe = self.catalog.get(recipe)?;
        let mut session = ScalingSession::new();
        let scaled = session.apply(recipe, directive, self.config.density_g_per_ml);
        write!(out, "{}", render_text(scaled))?;
        session.start_walk();

        let mut lines = input.lines();
        loop {
            let cursor = session.cursor();
            match cursor.state() {
                CursorState::AtStep(i) => {
                    if let Some(step) = cursor.current() {
                        match step.grams {
                            Some(grams) => writeln!(
                                out,
                                "Step {} of {}: {}: {:.0} g",
                                i + 1,
                                cursor.len(),
                                step.label,
                                grams
                            )?,
                            None => writeln!(out, "Step {} of {}: {}", i + 1, cursor.len(), step.label)?,
                        }
                    }
                    writeln!(out, "[Enter] next, [b]ack, [r]estart, [q]uit")?;
                }
                CursorState::Completed => {
                    writeln!(out, "All ingredients processed!")?;
                    writeln!(out, "[Enter] done, [b]ack, [r]estart")?;
                }
                CursorState::NotStarted => break,
            }
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let completed = session.cursor().state() == CursorState::Completed;
            let cursor = session.cursor_mut();
            match line.trim().to_lowercase().as_str() {
                "" | "n" | "next" if completed => cursor.reset(),
                "" | "n" | "next" => cursor.next(),
                "b" | "back" => cursor.back(),
                "r" | "restart" => cursor.restart(),
                "q" | "quit" => cursor.reset(),
                other => writeln!(out, "Unknown command '{}'", other)?,
            }
        }
        Ok(())
    }

    async fn inventory<W: Write>(&self, action: StockAction, out: &mut W) -> Result<()> {
        let mut inventory = self.store.load_inventory(&self.catalog).await;
        match action {
            StockAction::List {
                filter,
                show_excluded,
            } => {
                let exclusions = self.exclusions(show_excluded).await;
                for (name, stock) in inventory.visible(&exclusions, &filter) {
                    writeln!(out, "{}: {} {}", name, stock.amount, stock.unit)?;
                }
            }
            StockAction::Set {
                ingredient,
                amount,
                unit,
            } => {
                let amount = parse_grams(&ingredient, &amount)?;
                inventory.set(&ingredient, amount, &unit);
                self.store.save(&inventory).await?;
                writeln!(out, "{}: {} {}", ingredient, amount, unit)?;
            }
        }
        Ok(())
    }

    async fn thresholds<W: Write>(&self, action: StockAction, out: &mut W) -> Result<()> {
        let mut thresholds = self.store.load_thresholds(&self.catalog).await;
        match action {
            StockAction::List {
                filter,
                show_excluded,
            } => {
                let exclusions = self.exclusions(show_excluded).await;
                for (name, threshold) in thresholds.visible(&exclusions, &filter) {
                    writeln!(out, "{}: minimum {} {}", name, threshold.minimum, threshold.unit)?;
                }
            }
            StockAction::Set {
                ingredient,
                amount,
                unit,
            } => {
                let minimum = parse_grams(&ingredient, &amount)?;
                thresholds.set(&ingredient, minimum, &unit);
                self.store.save(&thresholds).await?;
                writeln!(out, "{}: minimum {} {}", ingredient, minimum, unit)?;
            }
        }
        Ok(())
    }

    async fn exclusions(&self, show_excluded: bool) -> ExclusionSet {
        if show_excluded {
            ExclusionSet::default()
        } else {
            self.store.load().await
        }
    }

    async fn set_excluded<W: Write>(&self, ingredient: &str, exclude: bool, out: &mut W) -> Result<()> {
        let mut exclusions: ExclusionSet = self.store.load().await;
        let changed = if exclude {
            exclusions.exclude(ingredient)
        } else {
            exclusions.include(ingredient)
        };
        if changed {
            self.store.save(&exclusions).await?;
        }
        let verb = if exclude { "Excluded" } else { "Included" };
        writeln!(out, "{} {}", verb, ingredient)?;
        Ok(())
    }

    async fn reorder<W: Write>(&self, out: &mut W) -> Result<()> {
        let inventory = self.store.load_inventory(&self.catalog).await;
        let thresholds = self.store.load_thresholds(&self.catalog).await;
        let exclusions: ExclusionSet = self.store.load().await;
        let alerts = needs_reorder_known(
            &inventory,
            &thresholds,
            &exclusions,
            &self.catalog.known_ingredients(),
        );
        if alerts.is_empty() {
            writeln!(out, "All ingredients are above their minimums.")?;
        }
        for (name, alert) in &alerts {
            writeln!(out, "{}: {}", name, alert)?;
        }
        Ok(())
    }

    async fn lineup<W: Write>(&self, action: LineupAction, out: &mut W) -> Result<()> {
        match action {
            LineupAction::Show => {
                let lineup: WeeklyLineup = self.store.load().await;
                for flavor in lineup.flavors() {
                    writeln!(out, "{}", flavor)?;
                }
            }
            LineupAction::Set { flavors } => {
                for flavor in &flavors {
                    self.catalog.get(flavor.trim())?;
                }
                let lineup = WeeklyLineup::new(flavors);
                let pruned = self.store.save_lineup(&lineup).await?;
                writeln!(
                    out,
                    "Lineup set to {} flavors ({} flavor counts removed)",
                    lineup.flavors().len(),
                    pruned
                )?;
            }
        }
        Ok(())
    }

    async fn flavors<W: Write>(&self, action: FlavorAction, out: &mut W) -> Result<()> {
        let mut flavors: FlavorInventory = self.store.load().await;
        match action {
            FlavorAction::List => {
                let lineup: WeeklyLineup = self.store.load().await;
                let names: Vec<String> = if lineup.is_empty() {
                    flavors.0.keys().cloned().collect()
                } else {
                    lineup.flavors().to_vec()
                };
                for name in names {
                    match flavors.get(&name) {
                        Some(stock) => writeln!(
                            out,
                            "{}: {} qt (updated {})",
                            name,
                            stock.quarts,
                            stock.last_updated.format("%Y-%m-%d %H:%M")
                        )?,
                        None => writeln!(out, "{}: not counted", name)?,
                    }
                }
            }
            FlavorAction::Set { flavor, quarts } => {
                self.catalog.get(&flavor)?;
                let lineup: WeeklyLineup = self.store.load().await;
                if !lineup.is_empty() && !lineup.contains(&flavor) {
                    return Err(KitchenError::NotInLineup(flavor).into());
                }
                let quarts = parse_grams(&flavor, &quarts)?;
                flavors.set_quarts(&flavor, quarts, chrono::Local::now().naive_local());
                self.store.save(&flavors).await?;
                writeln!(out, "{}: {} qt", flavor, quarts)?;
            }
        }
        Ok(())
    }
}
