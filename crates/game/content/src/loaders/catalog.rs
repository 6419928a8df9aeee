//! Equipment and unit catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{Armor, Explosive, UnitTemplate, Weapon};

use crate::catalog::Catalog;
use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSpec {
    pub weapons: Vec<Weapon>,
    pub armor: Vec<Armor>,
    pub explosives: Vec<Explosive>,
    pub units: Vec<UnitTemplate>,
}

/// Loader for the equipment/unit catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let spec: CatalogSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let mut catalog = Catalog::empty();
        for weapon in spec.weapons {
            catalog.add_weapon(weapon);
        }
        for armor in spec.armor {
            catalog.add_armor(armor);
        }
        for explosive in spec.explosives {
            catalog.add_explosive(explosive);
        }
        for unit in spec.units {
            catalog.add_unit(unit);
        }
        Ok(catalog)
    }
}
