//! Turn and phase scheduling.
//!
//! The [`CombatEngine`] is the authoritative reducer for [`CombatState`]'s
//! phase machine. Phases advance strictly in order (soldier, enemy,
//! environment, turn end) and each transition performs the entry work of
//! the phase it lands in. The engine never calls AI itself; the runtime
//! drives the enemy phase between transitions and the engine only
//! sequences.

mod environment;

pub use environment::{EnvironmentReport, UnitTick, run_environment_phase};

use crate::combat::CombatError;
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::mission::{MissionStatus, evaluate_mission};
use crate::reaction::clear_overwatch_for_side;
use crate::state::{CombatState, Phase};

/// Errors during phase transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    /// The mission has reached a terminal state; no further turns run.
    #[error("mission is over ({0:?})")]
    MissionOver(MissionStatus),

    /// Resolution inside a phase failed (missing oracle, unknown unit).
    #[error(transparent)]
    Combat(#[from] CombatError),
}

impl GameError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissionOver(_) => ErrorSeverity::Recoverable,
            Self::Combat(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissionOver(_) => "PHASE_MISSION_OVER",
            Self::Combat(inner) => inner.error_code(),
        }
    }
}

/// Result of advancing the phase machine by one step.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseOutcome {
    /// The phase that is now active.
    pub phase: Phase,
    /// Filled when the step ran the environment phase.
    pub environment: Option<EnvironmentReport>,
    /// Mission status after any evaluation this step performed.
    pub mission: MissionStatus,
}

/// Phase machine reducer over a combat state.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
    config: &'a CombatConfig,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState, config: &'a CombatConfig) -> Self {
        Self { state, config }
    }

    /// The currently active phase.
    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    /// True when the soldier phase has nothing left to do: every living
    /// soldier is out of action points.
    pub fn soldier_phase_spent(&self) -> bool {
        self.state.soldiers_spent()
    }

    /// Advances the phase machine by exactly one transition.
    ///
    /// - `SoldierPhase` → `EnemyPhase` (skipped straight to
    ///   `EnvironmentPhase` when AI is disabled by configuration)
    /// - `EnemyPhase` → `EnvironmentPhase`, running ledger ticks, fuses,
    ///   and chain reactions
    /// - `EnvironmentPhase` → `TurnEnd`, evaluating the mission tracker
    ///   (its once-per-turn evaluation point)
    /// - `TurnEnd` → next turn's `SoldierPhase`: action points reset,
    ///   initiative order rebuilt, turn counter incremented; a finished
    ///   mission halts the machine instead
    pub fn advance(&mut self, env: &CombatEnv<'_>) -> Result<PhaseOutcome, PhaseError> {
        match self.state.turn.phase {
            Phase::SoldierPhase => {
                if self.config.ai_enabled {
                    self.state.turn.phase = Phase::EnemyPhase;
                    // Enemy turn starts: their unfired watches from last
                    // turn expire.
                    clear_overwatch_for_side(self.state, false);
                } else {
                    self.state.turn.phase = Phase::EnemyPhase;
                    return self.advance(env);
                }
                Ok(self.outcome(None))
            }

            Phase::EnemyPhase => {
                self.state.turn.phase = Phase::EnvironmentPhase;
                let report = run_environment_phase(self.state, env)?;
                Ok(self.outcome(Some(report)))
            }

            Phase::EnvironmentPhase => {
                self.state.turn.phase = Phase::TurnEnd;
                evaluate_mission(self.state);
                Ok(self.outcome(None))
            }

            Phase::TurnEnd => {
                if self.state.mission.status.is_terminal() {
                    return Err(PhaseError::MissionOver(self.state.mission.status));
                }

                for unit in self.state.units_mut() {
                    if unit.is_active() {
                        unit.reset_action_points();
                    }
                }
                clear_overwatch_for_side(self.state, true);
                self.state.turn.order = self.state.initiative_order();
                self.state.turn.turn += 1;
                self.state.turn.phase = Phase::SoldierPhase;
                Ok(self.outcome(None))
            }
        }
    }

    fn outcome(&self, environment: Option<EnvironmentReport>) -> PhaseOutcome {
        PhaseOutcome {
            phase: self.state.turn.phase,
            environment,
            mission: self.state.mission.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{MissionKind, MissionState, Objective, ObjectiveCondition};
    use crate::state::{ActionPoints, Faction, Position, UnitId, UnitState};
    use crate::testing::TestEnv;

    fn two_sided_state() -> CombatState {
        let mut state = CombatState::new(5);
        let mut soldier = UnitState::new(UnitId(0), "s", Faction::Soldier, Position::new(0, 0));
        soldier.stats.initiative = 12;
        state.spawn_unit(soldier);
        let mut alien = UnitState::new(UnitId(0), "a", Faction::Alien, Position::new(5, 5));
        alien.stats.initiative = 15;
        state.spawn_unit(alien);
        state.mission = MissionState::new(MissionKind::Elimination)
            .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead));
        state.turn.order = state.initiative_order();
        state
    }

    #[test]
    fn full_turn_cycle_returns_to_soldier_phase() {
        let mut state = two_sided_state();
        let config = CombatConfig::default();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut engine = CombatEngine::new(&mut state, &config);
        assert_eq!(engine.phase(), Phase::SoldierPhase);

        assert_eq!(engine.advance(&env).unwrap().phase, Phase::EnemyPhase);
        assert_eq!(engine.advance(&env).unwrap().phase, Phase::EnvironmentPhase);
        assert_eq!(engine.advance(&env).unwrap().phase, Phase::TurnEnd);
        assert_eq!(engine.advance(&env).unwrap().phase, Phase::SoldierPhase);
        assert_eq!(state.turn.turn, 2);
    }

    #[test]
    fn disabled_ai_skips_the_enemy_phase() {
        let mut state = two_sided_state();
        let config = CombatConfig::with_ai_disabled();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut engine = CombatEngine::new(&mut state, &config);
        let outcome = engine.advance(&env).unwrap();
        assert_eq!(outcome.phase, Phase::EnvironmentPhase);
        assert!(outcome.environment.is_some());
    }

    #[test]
    fn turn_end_resets_action_points_and_rebuilds_order() {
        let mut state = two_sided_state();
        state.unit_mut(UnitId(0)).unwrap().action_points = ActionPoints::ZERO;
        let config = CombatConfig::default();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut engine = CombatEngine::new(&mut state, &config);
        for _ in 0..4 {
            engine.advance(&env).unwrap();
        }

        let soldier = state.unit(UnitId(0)).unwrap();
        assert_eq!(soldier.action_points, soldier.max_action_points);
        // Alien initiative 15 beats soldier 12.
        assert_eq!(state.turn.order, vec![UnitId(1), UnitId(0)]);
    }

    #[test]
    fn terminal_mission_halts_the_machine() {
        let mut state = two_sided_state();
        state.unit_mut(UnitId(1)).unwrap().take_damage(999);
        let config = CombatConfig::default();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut engine = CombatEngine::new(&mut state, &config);
        engine.advance(&env).unwrap(); // -> enemy
        engine.advance(&env).unwrap(); // -> environment
        let outcome = engine.advance(&env).unwrap(); // -> turn end, evaluates
        assert_eq!(outcome.mission, MissionStatus::Completed);

        let err = engine.advance(&env).unwrap_err();
        assert_eq!(err, PhaseError::MissionOver(MissionStatus::Completed));
    }
}
