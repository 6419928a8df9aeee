//! Combat event log.
//!
//! High-level occurrences appended by the session as it drives the core:
//! shots resolved, phases changed, units lost. The log is the session's
//! audit trail; hosts render it, tests assert on it, and a fixed seed
//! reproduces it entry for entry.

use serde::Serialize;
use tactics_core::{
    AreaAttackResult, CombatResult, MissionStatus, Phase, Position, ShotKind, UnitId,
};

/// High-level combat events, in session order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CombatEvent {
    /// A single-target attack was resolved (including blocked attempts).
    AttackResolved {
        attacker: UnitId,
        target: UnitId,
        kind: ShotKind,
        result: CombatResult,
    },

    /// An explosive went off.
    ExplosiveDetonated { result: AreaAttackResult },

    /// A watcher fired out of turn at a moving unit.
    ReactionTriggered {
        watcher: UnitId,
        target: UnitId,
        kind: ShotKind,
        result: CombatResult,
    },

    /// A unit completed a move.
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },

    /// A unit was spotted and lost concealment.
    ConcealmentBroken { unit: UnitId },

    /// A unit reached the extraction zone and left the field.
    UnitExtracted { unit: UnitId },

    /// A unit's health reached zero.
    UnitKilled { unit: UnitId },

    /// Damage-over-time ticked on a unit during the environment phase.
    StatusTicked {
        unit: UnitId,
        damage: u32,
        died: bool,
    },

    /// The phase machine advanced.
    PhaseChanged { phase: Phase, turn: u32 },

    /// The mission reached a terminal state.
    MissionEnded { status: MissionStatus },

    /// An enemy AI faulted; its unit forfeited the turn.
    AiFaulted { unit: UnitId, reason: String },
}

/// Append-only event log for one session.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serializes the whole log as JSON, for export to host tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_serializes_to_json() {
        let mut log = EventLog::new();
        log.push(CombatEvent::PhaseChanged {
            phase: Phase::EnemyPhase,
            turn: 1,
        });
        log.push(CombatEvent::UnitKilled { unit: UnitId(3) });

        let json = log.to_json().unwrap();
        assert!(json.contains("PhaseChanged"));
        assert!(json.contains("UnitKilled"));
    }
}
