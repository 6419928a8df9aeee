//! Area-of-effect resolution.
//!
//! Explosives do not roll to hit: everything inside the radius takes
//! distance-attenuated damage, friend and foe alike. The only random
//! draws here are the chain-reaction rolls against payload-carrying
//! destructibles caught in the blast.

use crate::env::{CombatEnv, compute_seed};
use crate::state::{CombatState, Explosive, Position, UnitId};

use super::CombatError;

/// Roll context for chain-reaction draws.
const ROLL_CHAIN: u32 = 8;

/// Damage applied to one unit by a blast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaHit {
    pub unit: UnitId,
    pub damage: u32,
}

/// Result of one detonation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaAttackResult {
    pub impact: Position,
    pub hits: Vec<AreaHit>,
    /// Payload-carrying destructibles this blast set off (their fuses are
    /// now lit at zero; the environment phase cascades them).
    pub chained: usize,
    pub message: String,
}

/// Distance falloff in hundredths: full damage at the impact point,
/// attenuating linearly to the explosive's floor factor at the edge.
fn falloff_factor(distance: u32, explosive: &Explosive) -> u32 {
    if explosive.radius == 0 {
        return 100;
    }
    let linear = 100u32.saturating_sub(distance * 100 / explosive.radius);
    linear.clamp(explosive.floor_factor, 100)
}

/// Detonates an explosive at a point.
///
/// Every active unit inside the radius takes `damage × falloff`, reduced
/// by armor but never below the damage floor while inside the radius.
/// There is no per-target hit roll. Destructibles in the radius take the
/// same attenuated damage; surviving payload carriers roll the blast's
/// chain chance and light their fuse on success.
pub fn detonate(
    state: &mut CombatState,
    impact: Position,
    explosive: &Explosive,
    env: &CombatEnv<'_>,
) -> Result<AreaAttackResult, CombatError> {
    let tables = env.tables()?;
    let rng = env.rng()?;
    let floor = tables.damage_floor();

    // Work out every unit hit before mutating anything.
    let struck: Vec<(UnitId, u32)> = state
        .active_units()
        .filter_map(|unit| {
            let distance = unit.position.euclidean_distance(&impact);
            if distance > explosive.radius {
                return None;
            }
            let attenuated = explosive.damage * falloff_factor(distance, explosive) / 100;
            let reduction = unit.armor.as_ref().map_or(0, |a| a.damage_reduction);
            Some((unit.id, attenuated.saturating_sub(reduction).max(floor)))
        })
        .collect();

    let mut hits = Vec::with_capacity(struck.len());
    for (id, damage) in struck {
        if let Some(unit) = state.unit_mut(id) {
            let applied = unit.take_damage(damage);
            hits.push(AreaHit {
                unit: id,
                damage: applied,
            });
        }
    }

    // Scenery inside the blast.
    let session_seed = state.session_seed;
    let mut chained = 0;
    for index in 0..state.destructibles.len() {
        let (position, destroyed_before) = {
            let object = &state.destructibles[index];
            (object.position, object.is_destroyed())
        };
        if destroyed_before {
            continue;
        }
        let distance = position.euclidean_distance(&impact);
        if distance > explosive.radius {
            continue;
        }

        let damage = explosive.damage * falloff_factor(distance, explosive) / 100;
        let object = &mut state.destructibles[index];
        let destroyed = object.take_damage(damage);
        let has_payload = object.payload.is_some();

        if has_payload && (destroyed || explosive.chain_chance > 0) {
            // Destruction always sets the charge off; a near miss rolls
            // the blast's chain chance.
            let triggers = destroyed || {
                let nonce = state.turn.next_nonce();
                let seed = compute_seed(session_seed, nonce, index as u32, ROLL_CHAIN);
                rng.chance(seed, i32::from(explosive.chain_chance))
            };
            if triggers {
                state.destructibles[index].ignite(0);
                chained += 1;
            }
        }
    }

    let message = format!(
        "{} detonates at ({}, {}) hitting {} unit(s)",
        explosive.name,
        impact.x,
        impact.y,
        hits.len()
    );

    Ok(AreaAttackResult {
        impact,
        hits,
        chained,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DestructibleId, DestructibleState, Faction, UnitId, UnitState};
    use crate::testing::{TestEnv, frag_grenade};

    fn soldier_at(state: &mut CombatState, x: i32, y: i32) -> UnitId {
        let mut unit = UnitState::new(UnitId(0), "s", Faction::Soldier, Position::new(x, y));
        unit.health.current = 30;
        unit.health.max = 30;
        state.spawn_unit(unit)
    }

    #[test]
    fn falloff_attenuates_with_distance_and_floors() {
        // radius 3, damage 25, floor factor 30: center 25, edge 7, outside 0
        let grenade = frag_grenade();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(1);
        let near = soldier_at(&mut state, 0, 0);
        let far = soldier_at(&mut state, 3, 0);
        let outside = soldier_at(&mut state, 7, 0);

        let result = detonate(&mut state, Position::new(0, 0), &grenade, &env).unwrap();

        assert_eq!(result.hits.len(), 2);
        let damage_of = |id: UnitId| result.hits.iter().find(|h| h.unit == id).map(|h| h.damage);
        assert_eq!(damage_of(near), Some(25));
        assert_eq!(damage_of(far), Some(7));
        assert_eq!(damage_of(outside), None);
    }

    #[test]
    fn blast_damage_inside_radius_is_at_least_one() {
        let mut grenade = frag_grenade();
        grenade.damage = 1;
        grenade.floor_factor = 0;
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(1);
        let edge = soldier_at(&mut state, 3, 0);

        let result = detonate(&mut state, Position::new(0, 0), &grenade, &env).unwrap();
        let hit = result.hits.iter().find(|h| h.unit == edge).unwrap();
        assert!(hit.damage >= 1);
    }

    #[test]
    fn blast_ignores_faction() {
        let grenade = frag_grenade();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(1);
        soldier_at(&mut state, 0, 0);
        let alien = state.spawn_unit(UnitState::new(
            UnitId(0),
            "a",
            Faction::Alien,
            Position::new(1, 0),
        ));

        let result = detonate(&mut state, Position::new(0, 0), &grenade, &env).unwrap();
        assert_eq!(result.hits.len(), 2);
        assert!(result.hits.iter().any(|h| h.unit == alien));
    }

    #[test]
    fn destroyed_payload_carrier_lights_its_fuse() {
        let grenade = frag_grenade();
        let test_env = TestEnv::default();
        let env = test_env.as_combat_env();

        let mut state = CombatState::new(1);
        let payload = state.register_explosive(frag_grenade());
        state.add_destructible(
            DestructibleState::new(DestructibleId(0), Position::new(1, 0), 1)
                .with_payload(payload),
        );

        let result = detonate(&mut state, Position::new(0, 0), &grenade, &env).unwrap();
        assert_eq!(result.chained, 1);
        assert_eq!(state.destructibles[0].fuse, Some(0));
    }
}
