//! Environment phase processing.
//!
//! Status ledgers tick, fuses burn down, and detonations cascade through
//! chain reactions. All of it runs in ascending arena order so a replayed
//! session applies the same damage in the same sequence.

use crate::combat::{AreaAttackResult, CombatError, detonate};
use crate::env::CombatEnv;
use crate::state::{CombatState, StatusEffectKind, UnitId};

/// What one unit's ledger tick did to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitTick {
    pub unit: UnitId,
    pub damage: u32,
    pub expired: usize,
    /// The tick's damage-over-time killed the unit.
    pub died: bool,
}

/// Everything that happened during one environment phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentReport {
    pub ticks: Vec<UnitTick>,
    pub detonations: Vec<AreaAttackResult>,
}

/// Runs the full environment phase: ledger ticks for every active unit,
/// then fuse countdown and detonation with same-phase chain cascades.
pub fn run_environment_phase(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<EnvironmentReport, CombatError> {
    let mut report = EnvironmentReport::default();

    // Status ticks, ascending unit id.
    let unit_ids: Vec<UnitId> = state.active_units().map(|u| u.id).collect();
    for id in unit_ids {
        let Some(unit) = state.unit_mut(id) else {
            continue;
        };

        let outcome = unit.status_effects.tick();
        let applied = unit.take_damage(outcome.damage);
        let died = !unit.is_alive();

        // The suppression counter follows the timed status out the door.
        if !unit.status_effects.has(StatusEffectKind::Suppressed) {
            unit.suppression = 0;
        }

        if outcome.damage > 0 || outcome.expired > 0 {
            report.ticks.push(UnitTick {
                unit: id,
                damage: applied,
                expired: outcome.expired,
                died,
            });
        }
    }

    // Detonate everything whose fuse has run out. Chain reactions light
    // further zero-turn fuses, so sweep until the field is quiet.
    loop {
        let ready = state
            .destructibles
            .iter()
            .position(|d| d.fuse == Some(0) && d.payload.is_some());
        let Some(index) = ready else {
            break;
        };

        let (position, handle) = {
            let object = &mut state.destructibles[index];
            let handle = object.payload.take().expect("checked above");
            object.fuse = None;
            object.health = 0;
            (object.position, handle)
        };

        let Some(explosive) = state.explosive(handle).cloned() else {
            debug_assert!(false, "payload handle points at no explosive");
            continue;
        };

        let result = detonate(state, position, &explosive, env)?;
        report.detonations.push(result);
    }

    // Timed explosives: burn the surviving fuses down one turn. Anything
    // that reaches zero here goes off next environment phase. Defused
    // leftovers (expired fuse, no payload) go inert.
    for object in &mut state.destructibles {
        match object.fuse {
            Some(fuse) if fuse > 0 => object.fuse = Some(fuse - 1),
            Some(_) => object.fuse = None,
            None => {}
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        DestructibleId, DestructibleState, Faction, Position, StatusEffectKind, UnitState,
    };
    use crate::testing::{TestEnv, frag_grenade};

    #[test]
    fn poison_drains_intensity_per_tick_until_purge() {
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(3);
        let mut unit = UnitState::new(UnitId(0), "sick", Faction::Soldier, Position::new(0, 0));
        unit.health = crate::state::HealthMeter::at_max(20);
        unit.status_effects.add(StatusEffectKind::Poisoned, 2, 5);
        let id = state.spawn_unit(unit);

        let report = run_environment_phase(&mut state, &env).unwrap();
        assert_eq!(report.ticks.len(), 1);
        assert_eq!(report.ticks[0].damage, 5);
        assert_eq!(state.unit(id).unwrap().health.current, 15);

        run_environment_phase(&mut state, &env).unwrap();
        assert_eq!(state.unit(id).unwrap().health.current, 10);
        assert!(state.unit(id).unwrap().status_effects.is_empty());

        // Purged: no further drain.
        let report = run_environment_phase(&mut state, &env).unwrap();
        assert!(report.ticks.is_empty());
    }

    #[test]
    fn dot_death_is_reported() {
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(3);
        let mut unit = UnitState::new(UnitId(0), "burning", Faction::Alien, Position::new(0, 0));
        unit.health.current = 2;
        unit.status_effects.add(StatusEffectKind::Burning, 3, 5);
        state.spawn_unit(unit);

        let report = run_environment_phase(&mut state, &env).unwrap();
        assert!(report.ticks[0].died);
    }

    #[test]
    fn suppression_counter_clears_when_status_expires() {
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(3);
        let mut unit = UnitState::new(UnitId(0), "pinned", Faction::Soldier, Position::new(0, 0));
        unit.status_effects.add(StatusEffectKind::Suppressed, 1, 0);
        unit.suppression = 2;
        let id = state.spawn_unit(unit);

        run_environment_phase(&mut state, &env).unwrap();
        assert_eq!(state.unit(id).unwrap().suppression, 0);
    }

    #[test]
    fn fuses_count_down_and_detonate_at_zero() {
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(3);
        let payload = state.register_explosive(frag_grenade());
        let mut barrel = DestructibleState::new(DestructibleId(0), Position::new(1, 1), 5)
            .with_payload(payload);
        barrel.fuse = Some(1);
        state.add_destructible(barrel);

        let report = run_environment_phase(&mut state, &env).unwrap();
        assert!(report.detonations.is_empty());
        assert_eq!(state.destructibles[0].fuse, Some(0));

        let report = run_environment_phase(&mut state, &env).unwrap();
        assert_eq!(report.detonations.len(), 1);
        assert!(state.destructibles[0].is_destroyed());
    }

    #[test]
    fn chain_reaction_cascades_within_one_phase() {
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(3);
        // 100% chain chance so the cascade is deterministic.
        let mut charge = frag_grenade();
        charge.chain_chance = 100;
        let payload = state.register_explosive(charge);

        let mut first = DestructibleState::new(DestructibleId(0), Position::new(0, 0), 5)
            .with_payload(payload);
        first.fuse = Some(0);
        state.add_destructible(first);
        state.add_destructible(
            DestructibleState::new(DestructibleId(0), Position::new(2, 0), 50)
                .with_payload(payload),
        );

        let report = run_environment_phase(&mut state, &env).unwrap();
        assert_eq!(report.detonations.len(), 2);
        assert!(state.destructibles.iter().all(|d| d.is_destroyed()));
    }
}
