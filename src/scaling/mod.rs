pub mod containers;
pub mod directive;
pub mod engine;
pub mod steps;

pub use containers::{ContainerKind, DEFAULT_MIX_DENSITY_G_PER_ML};
pub use directive::ScalingDirective;
pub use engine::{total_weight, ScaleWarning, ScaledRecipe};
pub use steps::{build_step_sequence, CursorState, Step, StepCursor};
