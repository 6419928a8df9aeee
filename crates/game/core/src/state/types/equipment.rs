//! Weapon, armor, and explosive stat blocks.
//!
//! Stat blocks are immutable after creation. Weapons live in a shared table
//! on the combat state and are referenced by handle; the mutable ammo count
//! lives on the carrying unit, so two units can never fight over one stat
//! block. Armor is owned by exactly one unit.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::state::types::status::StatusEffectKind;

/// Reference into the session's shared weapon table.
///
/// Weapons are addressed by handle, never by display name: names are not
/// guaranteed unique and the arena index is stable for the whole session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponHandle(pub u16);

impl WeaponHandle {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reference into the explosive catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplosiveHandle(pub u16);

/// Weapon class; drives the action-point cost policy, not per-name
/// special cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    /// Rifles, shotguns, cannons. Firing typically consumes the turn.
    #[default]
    Primary,
    /// Pistols and sidearms. Fractional action-point cost.
    Secondary,
    /// Swords and fists. Melee only.
    Blade,
}

/// Distance metric a weapon measures range with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeMetric {
    #[default]
    Manhattan,
    Euclidean,
}

/// On-hit status proc carried by a weapon or ammo type.
///
/// Each proc rolls independently on every successful hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusProc {
    pub kind: StatusEffectKind,
    /// Percent chance in [0, 100].
    pub chance: u8,
    pub duration: u8,
    pub intensity: u16,
}

/// Immutable weapon stat block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weapon {
    /// Catalog key, e.g. "assault_rifle". Display data, never an address.
    pub name: String,
    pub class: WeaponClass,
    pub damage: u32,
    /// Base accuracy in percent.
    pub accuracy: i32,
    /// Effective range in tiles.
    pub range: u32,
    pub range_metric: RangeMetric,
    /// Magazine size. Zero means the weapon needs no ammo (blades).
    pub ammo_capacity: u16,
    /// Additional critical chance in percent.
    pub crit_bonus: i32,
    /// Independent on-hit status rolls.
    pub on_hit: ArrayVec<StatusProc, { CombatConfig::MAX_STATUS_PROCS }>,
}

impl Weapon {
    /// True for classes that fire projectiles and consume ammo.
    #[inline]
    pub fn is_ranged(&self) -> bool {
        !matches!(self.class, WeaponClass::Blade)
    }

    /// Adds an on-hit status proc. Procs past the capacity are dropped.
    pub fn with_proc(mut self, proc: StatusProc) -> Self {
        if !self.on_hit.is_full() {
            self.on_hit.push(proc);
        }
        self
    }
}

/// Per-unit ammo state for the equipped weapon.
///
/// Kept on the unit rather than the weapon so a shared stat block stays
/// immutable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoState {
    pub current: u16,
    /// Specialty rounds currently loaded.
    pub kind: AmmoKind,
}

impl AmmoState {
    pub const fn full(capacity: u16) -> Self {
        Self {
            current: capacity,
            kind: AmmoKind::Standard,
        }
    }

    pub const fn with_kind(mut self, kind: AmmoKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.current == 0
    }

    /// Spends one round; returns false if the magazine was already empty.
    pub fn spend(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }
}

/// Specialty ammunition loaded into a weapon.
///
/// A pure tag: the modifiers a round grants come from
/// `TablesOracle::ammo_profile`, so balance numbers stay configuration.
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
pub enum AmmoKind {
    #[default]
    Standard,
    ArmorPiercing,
    Incendiary,
    Venom,
}

/// Immutable armor stat block, owned by exactly one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Armor {
    pub name: String,
    /// Flat damage subtracted from every hit, before the minimum-damage
    /// floor.
    pub damage_reduction: u32,
    /// Aim penalty for heavy plating, in percent.
    pub aim_penalty: i32,
}

/// Immutable explosive stat block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Explosive {
    pub name: String,
    pub damage: u32,
    /// Blast radius in tiles (euclidean).
    pub radius: u32,
    /// Falloff floor factor in hundredths: damage at the blast edge never
    /// drops below `damage * floor_factor / 100`.
    pub floor_factor: u32,
    /// Percent chance that this payload sets off a neighboring destructible
    /// when it detonates.
    pub chain_chance: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ammo_spend_stops_at_empty() {
        let mut ammo = AmmoState::full(2);
        assert!(ammo.spend());
        assert!(ammo.spend());
        assert!(!ammo.spend());
        assert!(ammo.is_empty());
    }
}
