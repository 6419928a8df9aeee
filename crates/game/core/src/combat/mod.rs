//! Attack resolution pipeline.
//!
//! One fixed-order pipeline resolves every single-target shot kind:
//! preconditions, accuracy, positional and status modifiers, clamp, hit
//! roll, crit roll, damage, side effects, result. Area attacks skip the
//! hit roll and apply distance falloff instead.
//!
//! All balance numbers come from the tables oracle and all randomness from
//! the rng oracle; given a session seed, resolution is fully
//! deterministic.

pub mod accuracy;
pub mod area;
pub mod damage;
pub mod resolve;
pub mod result;

pub use accuracy::{crit_chance, hit_chance};
pub use area::{AreaAttackResult, AreaHit, detonate};
pub use damage::compute_damage;
pub use resolve::{AttackContext, ShotKind, can_attack, resolve_attack};
pub use result::{AttackBlocked, AttackOutcome, CombatResult};

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::UnitId;

/// Faults during resolution. These are not gameplay outcomes: a blocked
/// attack is a [`CombatResult`], an unknown unit id or a missing oracle is
/// a `CombatError`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// No unit with this id exists in the state.
    #[error("unit {0} not found")]
    UnknownUnit(UnitId),

    /// A required oracle was missing from the environment.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_) => ErrorSeverity::Validation,
            Self::Oracle(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "COMBAT_UNKNOWN_UNIT",
            Self::Oracle(inner) => inner.error_code(),
        }
    }
}
