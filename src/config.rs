//! Runtime configuration: command-line flag, then environment variable
//! (a `.env` file is loaded by the binary), then compiled default.

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::{parse_grams, KitchenError, Result};
use crate::inventory::RecordStore;
use crate::scaling::DEFAULT_MIX_DENSITY_G_PER_ML;

pub const DATA_DIR_ENV_VAR: &str = "KITCHEN_DATA_DIR";
pub const CATALOG_ENV_VAR: &str = "KITCHEN_CATALOG";
pub const DENSITY_ENV_VAR: &str = "KITCHEN_MIX_DENSITY";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// `None` uses the compiled-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub density_g_per_ml: f64,
}

impl AppConfig {
    pub fn resolve(
        data_dir: Option<PathBuf>,
        catalog_path: Option<PathBuf>,
        density: Option<f64>,
    ) -> Result<Self> {
        Self::resolve_with(data_dir, catalog_path, density, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(
        data_dir: Option<PathBuf>,
        catalog_path: Option<PathBuf>,
        density: Option<f64>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let data_dir = data_dir
            .or_else(|| env(DATA_DIR_ENV_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let catalog_path = catalog_path.or_else(|| env(CATALOG_ENV_VAR).map(PathBuf::from));
        let density_g_per_ml = match density {
            Some(value) => value,
            None => match env(DENSITY_ENV_VAR) {
                Some(text) => parse_grams(DENSITY_ENV_VAR, &text)?,
                None => DEFAULT_MIX_DENSITY_G_PER_ML,
            },
        };
        if !(density_g_per_ml.is_finite() && density_g_per_ml > 0.0) {
            return Err(KitchenError::InvalidNumber {
                field: "mix density".to_string(),
                input: density_g_per_ml.to_string(),
            });
        }
        Ok(Self {
            data_dir,
            catalog_path,
            density_g_per_ml,
        })
    }

    pub async fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path).await,
            None => Catalog::builtin(),
        }
    }

    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.data_dir)
    }
}
