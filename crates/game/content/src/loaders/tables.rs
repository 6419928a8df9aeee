//! Balance tables loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::tables::BalanceTables;

/// Loader for balance tables from TOML files.
///
/// Any field omitted from the file keeps its stock value, so a balance
/// patch only names what it changes.
pub struct TablesLoader;

impl TablesLoader {
    /// Load balance tables from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse balance tables from TOML text.
    pub fn parse(content: &str) -> LoadResult<BalanceTables> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::{ShotKind, TablesOracle};

    #[test]
    fn partial_override_keeps_stock_values() {
        let tables = TablesLoader::parse(
            r#"
            damage_floor = 2
            height_bonus_per_level = 12

            [aim_clamp]
            floor = 10
            ceiling = 90
            "#,
        )
        .unwrap();

        assert_eq!(tables.damage_floor, 2);
        assert_eq!(tables.height_bonus_per_level, 12);
        assert_eq!(tables.aim_clamp.floor, 10);
        // Untouched sections keep their defaults.
        let stock = BalanceTables::default();
        assert_eq!(
            tables.shot_profile(ShotKind::Aimed),
            stock.shot_profile(ShotKind::Aimed)
        );
    }

    #[test]
    fn empty_file_yields_stock_tables() {
        let tables = TablesLoader::parse("").unwrap();
        assert_eq!(tables, BalanceTables::default());
    }
}
