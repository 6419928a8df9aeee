//! Damage computation: pipeline step eight.

use crate::env::{AmmoProfile, ShotProfile, TablesOracle};
use crate::state::{Armor, UnitState, Weapon};

/// Computes the damage of a successful hit.
///
/// # Formula
///
/// ```text
/// base = weapon damage (unit base damage when unarmed)
///        × shot-kind damage multiplier / 100
///        + ammo bonus
/// if critical: base = base × crit multiplier / 100
/// final = max(base − effective armor reduction, damage floor)
/// ```
///
/// Armor reduction is lowered by the round's armor pierce before it
/// applies, and a hit never deals less than the configured floor.
pub fn compute_damage(
    attacker: &UnitState,
    weapon: Option<&Weapon>,
    armor: Option<&Armor>,
    profile: &ShotProfile,
    ammo: &AmmoProfile,
    critical: bool,
    tables: &(impl TablesOracle + ?Sized),
) -> u32 {
    let weapon_damage = weapon.map_or(attacker.stats.base_damage, |w| w.damage);

    let mut damage = weapon_damage * profile.damage_multiplier / 100 + ammo.damage_bonus;

    if critical {
        damage = damage * attacker.stats.crit_multiplier / 100;
    }

    let reduction = armor
        .map(|a| a.damage_reduction.saturating_sub(ammo.armor_pierce))
        .unwrap_or(0);

    damage
        .saturating_sub(reduction)
        .max(tables.damage_floor())
}
