//! Traits describing the collaborators the core consumes.
//!
//! Oracles expose field geometry queries, balance tables, static catalogs,
//! and the random source. The [`Env`] aggregate bundles them so the
//! resolution pipeline and the engine can reach everything they need
//! without hard coupling to concrete implementations.

mod catalog;
mod error;
mod field;
mod rng;
mod tables;

pub use catalog::{CatalogOracle, UnitTemplate, UnitTemplateBuilder};
pub use error::OracleError;
pub use field::{CoverKind, FieldOracle, OpenField};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use tables::{
    AimClamp, AmmoProfile, ApCost, FlankingRules, ShotProfile, StatusAimModifiers,
    SuppressionRules, TablesOracle,
};

/// Aggregates the read-only oracles required by resolution and scheduling.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, F, T, C, R>
where
    F: FieldOracle + ?Sized,
    T: TablesOracle + ?Sized,
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    field: Option<&'a F>,
    tables: Option<&'a T>,
    catalog: Option<&'a C>,
    rng: Option<&'a R>,
}

pub type CombatEnv<'a> = Env<
    'a,
    dyn FieldOracle + 'a,
    dyn TablesOracle + 'a,
    dyn CatalogOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, F, T, C, R> Env<'a, F, T, C, R>
where
    F: FieldOracle + ?Sized,
    T: TablesOracle + ?Sized,
    C: CatalogOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        field: Option<&'a F>,
        tables: Option<&'a T>,
        catalog: Option<&'a C>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            field,
            tables,
            catalog,
            rng,
        }
    }

    pub fn with_all(field: &'a F, tables: &'a T, catalog: &'a C, rng: &'a R) -> Self {
        Self::new(Some(field), Some(tables), Some(catalog), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            field: None,
            tables: None,
            catalog: None,
            rng: None,
        }
    }

    /// Returns the FieldOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::FieldNotAvailable` if no field oracle was provided.
    pub fn field(&self) -> Result<&'a F, OracleError> {
        self.field.ok_or(OracleError::FieldNotAvailable)
    }

    /// Returns the TablesOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::TablesNotAvailable` if no tables oracle was provided.
    pub fn tables(&self) -> Result<&'a T, OracleError> {
        self.tables.ok_or(OracleError::TablesNotAvailable)
    }

    /// Returns the CatalogOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CatalogNotAvailable` if no catalog oracle was provided.
    pub fn catalog(&self) -> Result<&'a C, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RngNotAvailable` if no rng oracle was provided.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, F, T, C, R> Env<'a, F, T, C, R>
where
    F: FieldOracle + 'a,
    T: TablesOracle + 'a,
    C: CatalogOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based `CombatEnv`
    /// (borrows self).
    ///
    /// Use this when the same concrete bundle backs many resolution calls.
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        let field: Option<&'a dyn FieldOracle> = self.field.map(|field| field as _);
        let tables: Option<&'a dyn TablesOracle> = self.tables.map(|tables| tables as _);
        let catalog: Option<&'a dyn CatalogOracle> = self.catalog.map(|catalog| catalog as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|rng| rng as _);
        Env::new(field, tables, catalog, rng)
    }
}
