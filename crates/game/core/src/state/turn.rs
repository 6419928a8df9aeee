use super::UnitId;

/// The four phases of one combat turn, in their fixed order.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Phase {
    /// Player-controlled units spend their action points.
    #[default]
    SoldierPhase,
    /// Every living AI-controlled unit gets a decide/execute round.
    EnemyPhase,
    /// Status ledgers tick, fuses burn down, chain reactions resolve.
    EnvironmentPhase,
    /// Objectives evaluate, resources reset, the next turn begins.
    TurnEnd,
}

impl Phase {
    /// The phase that follows this one. `TurnEnd` wraps to the next turn's
    /// soldier phase.
    pub const fn next(self) -> Phase {
        match self {
            Phase::SoldierPhase => Phase::EnemyPhase,
            Phase::EnemyPhase => Phase::EnvironmentPhase,
            Phase::EnvironmentPhase => Phase::TurnEnd,
            Phase::TurnEnd => Phase::SoldierPhase,
        }
    }
}

/// Turn bookkeeping: counter, active phase, initiative order, RNG nonce.
///
/// Exactly one phase is active at a time and transitions are strictly
/// sequential; the engine is the only writer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Current turn number, starting at 1.
    pub turn: u32,

    /// The phase currently being played.
    pub phase: Phase,

    /// Initiative order for this turn: strict descending initiative,
    /// ties broken by ascending unit id. Rebuilt at every turn end.
    pub order: Vec<UnitId>,

    /// Monotone counter mixed into every RNG seed. Each random draw
    /// consumes one nonce, which makes a whole session replayable from
    /// `CombatState::session_seed`.
    pub nonce: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            turn: 1,
            phase: Phase::SoldierPhase,
            order: Vec::new(),
            nonce: 0,
        }
    }

    /// Consumes and returns the next RNG nonce.
    #[inline]
    pub fn next_nonce(&mut self) -> u64 {
        let nonce = self.nonce;
        self.nonce += 1;
        nonce
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
