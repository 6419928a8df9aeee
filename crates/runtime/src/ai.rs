//! Enemy AI collaborator seam.
//!
//! The core never inspects AI internals. Each enemy unit gets a
//! decide/execute round during the enemy phase; what happens inside
//! `decide` is the AI's business, and `execute` acts back on the session
//! through its public operations. Failures, whether returned errors or
//! outright panics, are contained at this boundary: the unit forfeits
//! its turn and the phase moves on.

use tactics_core::{CombatState, UnitId};

use crate::session::CombatSession;

/// Error reported by an AI's `execute`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct AiError(pub String);

impl AiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Opaque per-unit enemy decision maker.
///
/// The scheduler calls `decide` with a read-only snapshot, then `execute`
/// with the live session. `execute` returns whether the unit took an
/// action; on `Err` or a panic the scheduler records a fault and the
/// phase continues.
pub trait EnemyAi {
    /// Plan for this unit. Must not mutate anything outside the AI.
    fn decide(&mut self, state: &CombatState, unit: UnitId);

    /// Carry the plan out against the session.
    fn execute(&mut self, session: &mut CombatSession, unit: UnitId) -> Result<bool, AiError>;
}

/// AI that never acts. The default when no AI is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleAi;

impl EnemyAi for IdleAi {
    fn decide(&mut self, _state: &CombatState, _unit: UnitId) {}

    fn execute(&mut self, _session: &mut CombatSession, _unit: UnitId) -> Result<bool, AiError> {
        Ok(false)
    }
}
