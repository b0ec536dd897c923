//! Guided weighing: the flattened step list and the cursor walking it.

use serde::Serialize;
use tracing::debug;

use super::engine::ScaledRecipe;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub label: String,
    /// `None` marks the start of a sub-recipe section.
    pub grams: Option<f64>,
}

impl Step {
    pub fn is_section(&self) -> bool {
        self.grams.is_none()
    }
}

fn weigh((name, grams): (&str, &f64)) -> Step {
    Step {
        label: name.to_string(),
        grams: Some(*grams),
    }
}

/// Parent ingredients first, then one `[name]` marker per sub-recipe
/// followed by that sub-recipe's ingredients.
pub fn build_step_sequence(scaled: &ScaledRecipe) -> Vec<Step> {
    let mut steps: Vec<Step> = scaled.ingredients.iter().map(weigh).collect();
    for (sub_name, sub) in scaled.subrecipes.iter() {
        steps.push(Step {
            label: format!("[{}]", sub_name),
            grams: None,
        });
        steps.extend(sub.ingredients.iter().map(weigh));
    }
    steps
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    #[default]
    NotStarted,
    AtStep(usize),
    Completed,
}

/// Walks a snapshot of a step sequence. The snapshot is taken on `start`
/// so later rescaling cannot shift an in-progress walk.
#[derive(Debug, Clone, Default)]
pub struct StepCursor {
    steps: Vec<Step>,
    state: CursorState,
}

impl StepCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, sequence: &[Step]) {
        self.steps = sequence.to_vec();
        self.restart();
    }

    /// Back to the first step of the current snapshot.
    pub fn restart(&mut self) {
        self.state = if self.steps.is_empty() {
            CursorState::Completed
        } else {
            CursorState::AtStep(0)
        };
        debug!(state = ?self.state, steps = self.steps.len(), "Step walk restarted");
    }

    /// Drops the snapshot entirely.
    pub fn reset(&mut self) {
        self.steps.clear();
        self.state = CursorState::NotStarted;
    }

    pub fn next(&mut self) {
        if let CursorState::AtStep(i) = self.state {
            self.state = if i + 1 >= self.steps.len() {
                CursorState::Completed
            } else {
                CursorState::AtStep(i + 1)
            };
            debug!(state = ?self.state, "Step walk advanced");
        }
    }

    pub fn back(&mut self) {
        self.state = match self.state {
            CursorState::AtStep(i) => CursorState::AtStep(i.saturating_sub(1)),
            CursorState::Completed if !self.steps.is_empty() => {
                CursorState::AtStep(self.steps.len() - 1)
            }
            other => other,
        };
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn current(&self) -> Option<&Step> {
        match self.state {
            CursorState::AtStep(i) => self.steps.get(i),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
