//! Session-level errors.

use tactics_core::{CombatError, MissionStatus, OracleError, PhaseError, UnitId};

/// Errors surfaced by [`crate::CombatSession`].
///
/// Disallowed moves (no action points, bad target) are NOT errors; they
/// come back as blocked results or `false`. These variants cover setup
/// mistakes and collaborator faults.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A catalog key named in setup does not exist.
    #[error("catalog entry '{0}' not found")]
    UnknownCatalogKey(String),

    /// No unit with this id exists in the session.
    #[error("unit {0} not found")]
    UnknownUnit(UnitId),

    /// The mission has already reached a terminal state.
    #[error("mission is over ({0:?})")]
    MissionOver(MissionStatus),

    /// Fault inside the resolution core.
    #[error(transparent)]
    Combat(#[from] CombatError),

    /// Fault inside the phase machine.
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// A required oracle was missing.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}
