//! Per-recipe scaling session state.
//!
//! The caller owns one `ScalingSession` per interactive session. Switching
//! recipe or re-running a directive invalidates the scaled result and
//! cursor, so a step index can never point into another recipe's walk.

use tracing::debug;

use crate::catalog::Recipe;
use crate::scaling::{build_step_sequence, ScaledRecipe, ScalingDirective, StepCursor};

#[derive(Debug, Clone, Default)]
pub struct ScalingSession {
    recipe_name: Option<String>,
    directive: Option<ScalingDirective>,
    scaled: Option<ScaledRecipe>,
    cursor: StepCursor,
}

impl ScalingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipe_name(&self) -> Option<&str> {
        self.recipe_name.as_deref()
    }

    pub fn directive(&self) -> Option<&ScalingDirective> {
        self.directive.as_ref()
    }

    pub fn scaled(&self) -> Option<&ScaledRecipe> {
        self.scaled.as_ref()
    }

    pub fn cursor(&self) -> &StepCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut StepCursor {
        &mut self.cursor
    }

    /// Selecting a different recipe clears everything keyed to the old one.
    pub fn select_recipe(&mut self, name: &str) {
        if self.recipe_name.as_deref() == Some(name) {
            return;
        }
        debug!(from = ?self.recipe_name, to = name, "Recipe switched, session cleared");
        self.recipe_name = Some(name.to_string());
        self.invalidate();
    }

    /// Scales `recipe` and stores the result. Any walk in progress is reset.
    pub fn apply(
        &mut self,
        recipe: &Recipe,
        directive: ScalingDirective,
        density_g_per_ml: f64,
    ) -> &ScaledRecipe {
        self.select_recipe(&recipe.name);
        self.invalidate();
        let scaled = directive.apply(recipe, density_g_per_ml);
        self.directive = Some(directive);
        self.scaled.insert(scaled)
    }

    /// Snapshots the current scaled recipe into the cursor.
    /// Returns `false` when nothing has been scaled yet.
    pub fn start_walk(&mut self) -> bool {
        match &self.scaled {
            Some(scaled) => {
                let steps = build_step_sequence(scaled);
                self.cursor.start(&steps);
                true
            }
            None => false,
        }
    }

    fn invalidate(&mut self) {
        self.directive = None;
        self.scaled = None;
        self.cursor.reset();
    }
}
