pub mod records;
pub mod reorder;
pub mod store;

pub use records::{
    ExclusionSet, FlavorInventory, FlavorStock, IngredientInventory, IngredientThresholds,
    RecordKind, StockLevel, Threshold, WeeklyLineup,
};
pub use reorder::{needs_reorder, needs_reorder_known, ReorderAlert};
pub use store::RecordStore;
