//! Oracle access errors.
//!
//! Errors related to oracle availability and data access.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when accessing oracle data.
///
/// A missing oracle is fatal: the resolution pipeline cannot run without
/// field queries, balance tables, or a random source. A missing catalog
/// key is a validation error in the caller's setup data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// FieldOracle is not available in the environment.
    #[error("FieldOracle not available")]
    FieldNotAvailable,

    /// TablesOracle is not available in the environment.
    #[error("TablesOracle not available")]
    TablesNotAvailable,

    /// CatalogOracle is not available in the environment.
    #[error("CatalogOracle not available")]
    CatalogNotAvailable,

    /// RngOracle is not available in the environment.
    #[error("RngOracle not available")]
    RngNotAvailable,

    /// Catalog has no entry under the given key.
    #[error("catalog entry '{0}' not found")]
    CatalogKeyNotFound(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Missing oracles are fatal - the pipeline cannot proceed
            FieldNotAvailable | TablesNotAvailable | CatalogNotAvailable | RngNotAvailable => {
                ErrorSeverity::Fatal
            }

            // Bad keys are validation errors - invalid setup references
            CatalogKeyNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            FieldNotAvailable => "ORACLE_FIELD_NOT_AVAILABLE",
            TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            CatalogKeyNotFound(_) => "ORACLE_CATALOG_KEY_NOT_FOUND",
        }
    }
}
