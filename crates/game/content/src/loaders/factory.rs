//! Content factory for building oracles from data files.

use std::path::PathBuf;

use tactics_core::CombatConfig;

use crate::catalog::Catalog;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, TablesLoader};
use crate::tables::BalanceTables;

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tables.toml
/// └── catalog.ron
/// ```
///
/// Missing files fall back to the stock content, so a data directory only
/// has to ship what it customizes.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`, or defaults if the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load balance tables from `tables.toml`, or the stock tables if the
    /// file does not exist.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        let path = self.data_dir.join("tables.toml");
        if !path.exists() {
            return Ok(BalanceTables::default());
        }
        TablesLoader::load(&path)
    }

    /// Load the equipment/unit catalog from `catalog.ron`, or the stock
    /// catalog if the file does not exist.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let path = self.data_dir.join("catalog.ron");
        if !path.exists() {
            return Ok(Catalog::stock());
        }
        CatalogLoader::load(&path)
    }
}
