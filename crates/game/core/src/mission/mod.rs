//! Mission objectives and terminal status tracking.
//!
//! Objectives are predicates over unit state, evaluated exactly once per
//! turn end. `Completed` and `Failed` are terminal: once either is set,
//! further evaluation is a no-op and the scheduler stops advancing phases.

use crate::state::{AbilityFlags, CombatState, Position};

/// Mission archetype. Display/classification only; the winning and losing
/// rules come from the objective list.
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
pub enum MissionKind {
    #[default]
    Elimination,
    Extraction,
    Defense,
    Escort,
}

/// Terminal-state machine for the mission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissionStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
}

impl MissionStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, MissionStatus::InProgress)
    }
}

/// Axis-aligned rectangle of tiles, e.g. the extraction zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub min: Position,
    pub max: Position,
}

impl Zone {
    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
    }
}

/// Satisfaction predicate of one objective, checked against unit state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveCondition {
    /// No living enemy-faction unit remains.
    AllEnemiesDead,
    /// Every VIP-flagged unit has been extracted alive.
    AllVipsExtracted,
    /// At least one soldier is still alive at the given turn's end.
    SurviveUntilTurn(u32),
}

/// One named objective with its completion flag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub name: String,
    pub condition: ObjectiveCondition,
    pub complete: bool,
}

impl Objective {
    pub fn new(name: impl Into<String>, condition: ObjectiveCondition) -> Self {
        Self {
            name: name.into(),
            condition,
            complete: false,
        }
    }
}

/// Mission state: objective list, optional turn limit, terminal status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionState {
    pub kind: MissionKind,
    pub objectives: Vec<Objective>,
    /// Mission fails when this turn ends with objectives incomplete.
    pub turn_limit: Option<u32>,
    pub extraction_zone: Option<Zone>,
    pub status: MissionStatus,
}

impl MissionState {
    pub fn new(kind: MissionKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = Some(limit);
        self
    }

    pub fn with_extraction_zone(mut self, zone: Zone) -> Self {
        self.extraction_zone = Some(zone);
        self
    }
}

/// Evaluates the mission once. Called by the engine at every turn end.
///
/// Updates objective completion flags, then settles the terminal status:
/// all objectives satisfied wins, a wiped squad or an expired turn limit
/// loses. A status that is already terminal is returned unchanged.
pub fn evaluate_mission(state: &mut CombatState) -> MissionStatus {
    if state.mission.status.is_terminal() {
        return state.mission.status;
    }

    let turn = state.turn.turn;
    let enemies_remain = state
        .active_units()
        .any(|u| !u.faction.is_player_controlled());
    let soldiers_remain = state
        .active_units()
        .any(|u| u.faction.is_player_controlled());
    let vips_extracted = state
        .units()
        .iter()
        .filter(|u| u.has_ability(AbilityFlags::VIP))
        .all(|u| u.extracted && u.is_alive());
    let any_vip = state
        .units()
        .iter()
        .any(|u| u.has_ability(AbilityFlags::VIP));

    for objective in &mut state.mission.objectives {
        if objective.complete {
            continue;
        }
        objective.complete = match objective.condition {
            ObjectiveCondition::AllEnemiesDead => !enemies_remain,
            ObjectiveCondition::AllVipsExtracted => any_vip && vips_extracted,
            ObjectiveCondition::SurviveUntilTurn(limit) => soldiers_remain && turn >= limit,
        };
    }

    let all_complete = !state.mission.objectives.is_empty()
        && state.mission.objectives.iter().all(|o| o.complete);
    let out_of_turns = state
        .mission
        .turn_limit
        .is_some_and(|limit| turn >= limit);

    state.mission.status = if all_complete {
        MissionStatus::Completed
    } else if !soldiers_remain || out_of_turns {
        MissionStatus::Failed
    } else {
        MissionStatus::InProgress
    };

    state.mission.status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Faction, UnitId, UnitState};

    fn state_with(units: Vec<(Faction, u32)>) -> CombatState {
        let mut state = CombatState::new(0);
        for (i, (faction, health)) in units.into_iter().enumerate() {
            let mut unit = UnitState::new(
                UnitId(0),
                format!("u{i}"),
                faction,
                Position::new(i as i32, 0),
            );
            unit.health.current = health;
            state.spawn_unit(unit);
        }
        state
    }

    #[test]
    fn elimination_completes_when_enemies_die() {
        let mut state = state_with(vec![(Faction::Soldier, 5), (Faction::Alien, 0)]);
        state.mission = MissionState::new(MissionKind::Elimination)
            .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead));

        assert_eq!(evaluate_mission(&mut state), MissionStatus::Completed);
    }

    #[test]
    fn squad_wipe_fails() {
        let mut state = state_with(vec![(Faction::Soldier, 0), (Faction::Alien, 5)]);
        state.mission = MissionState::new(MissionKind::Elimination)
            .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead));

        assert_eq!(evaluate_mission(&mut state), MissionStatus::Failed);
    }

    #[test]
    fn turn_limit_expiry_fails_incomplete_missions() {
        let mut state = state_with(vec![(Faction::Soldier, 5), (Faction::Alien, 5)]);
        state.mission = MissionState::new(MissionKind::Extraction)
            .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead))
            .with_turn_limit(3);
        state.turn.turn = 3;

        assert_eq!(evaluate_mission(&mut state), MissionStatus::Failed);
    }

    #[test]
    fn terminal_status_is_sticky() {
        let mut state = state_with(vec![(Faction::Soldier, 5), (Faction::Alien, 0)]);
        state.mission = MissionState::new(MissionKind::Elimination)
            .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead));

        assert_eq!(evaluate_mission(&mut state), MissionStatus::Completed);

        // Spawn a fresh enemy; a completed mission must not reopen.
        let reinforcement = UnitState::new(UnitId(0), "late", Faction::Alien, Position::new(9, 9));
        state.spawn_unit(reinforcement);
        assert_eq!(evaluate_mission(&mut state), MissionStatus::Completed);
    }

    #[test]
    fn defense_completes_at_the_survival_turn() {
        let mut state = state_with(vec![(Faction::Soldier, 5), (Faction::Alien, 5)]);
        state.mission = MissionState::new(MissionKind::Defense).with_objective(Objective::new(
            "hold",
            ObjectiveCondition::SurviveUntilTurn(4),
        ));

        state.turn.turn = 3;
        assert_eq!(evaluate_mission(&mut state), MissionStatus::InProgress);

        state.turn.turn = 4;
        assert_eq!(evaluate_mission(&mut state), MissionStatus::Completed);
    }
}
