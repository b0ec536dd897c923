pub mod app;
pub mod batch_sheet;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod scaling;
pub mod session;
pub mod units;

pub use error::{KitchenError, Result};
