//! Hit chance calculation: pipeline steps two through five.
//!
//! Base accuracy, shot-kind modifier, positional modifiers, status
//! modifiers, clamp. Every magnitude comes from the tables oracle; the
//! math here is pure and deterministic.

use crate::env::{ShotProfile, TablesOracle};
use crate::state::{StatusEffectKind, UnitState, Weapon};

use super::resolve::AttackContext;

/// Computes the final hit chance for an attack, clamped to the configured
/// window.
///
/// # Formula
///
/// ```text
/// chance = base accuracy (weapon, or unit aim when unarmed)
///        + shot-kind aim modifier
///        + height bonus × positive height advantage
///        − cover penalty (scaled down when flanking)
///        + status modifiers (poisoned/disoriented/suppressed attacker,
///          marked target)
///        − attacker's own armor aim penalty
/// clamped to [floor, ceiling]
/// ```
pub fn hit_chance(
    attacker: &UnitState,
    target: &UnitState,
    weapon: Option<&Weapon>,
    profile: &ShotProfile,
    ctx: &AttackContext,
    tables: &(impl TablesOracle + ?Sized),
) -> i32 {
    let base = weapon.map_or(attacker.stats.aim, |w| w.accuracy);
    let mut chance = base + profile.aim_modifier;

    // Positional modifiers
    let height_levels = i32::from(ctx.height_advantage.max(0));
    chance += height_levels * tables.height_bonus_per_level();

    let mut cover_penalty = tables.cover_penalty(ctx.cover);
    if ctx.flanking {
        let factor = tables.flanking().cover_penalty_factor;
        cover_penalty = cover_penalty * factor as i32 / 100;
    }
    chance -= cover_penalty;

    // Status modifiers
    let mods = tables.status_modifiers();
    if attacker.status_effects.has(StatusEffectKind::Poisoned) {
        chance += mods.poisoned_attacker;
    }
    if attacker.status_effects.has(StatusEffectKind::Disoriented) {
        chance += mods.disoriented_attacker;
    }
    chance += mods.suppressed_per_stack * i32::from(attacker.suppression);
    if target.status_effects.has(StatusEffectKind::Marked) {
        chance += mods.marked_target;
    }

    if let Some(armor) = &attacker.armor {
        chance -= armor.aim_penalty;
    }

    tables.aim_clamp().apply(chance)
}

/// Total critical chance for an attack: unit base plus weapon, flanking,
/// height, and ammo bonuses.
pub fn crit_chance(
    attacker: &UnitState,
    weapon: Option<&Weapon>,
    ctx: &AttackContext,
    tables: &(impl TablesOracle + ?Sized),
) -> i32 {
    let mut chance = attacker.stats.crit_chance;
    if let Some(weapon) = weapon {
        chance += weapon.crit_bonus;
    }
    if ctx.flanking {
        chance += tables.flanking().crit_bonus;
    }
    let height_levels = i32::from(ctx.height_advantage.max(0));
    chance += height_levels * tables.height_crit_bonus_per_level();
    chance += tables.ammo_profile(ctx.ammo).crit_bonus;
    chance.clamp(0, 100)
}
