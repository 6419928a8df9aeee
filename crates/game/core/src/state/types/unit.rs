//! Unit state: the per-unit mutable combat attributes.

use bitflags::bitflags;

use super::common::{ActionPoints, Faction, Position, UnitId};
use super::equipment::{AmmoState, Armor, WeaponHandle};
use super::status::StatusLedger;

/// Current/maximum health pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthMeter {
    pub current: u32,
    pub max: u32,
}

impl HealthMeter {
    pub const fn at_max(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// Base combat statistics, set at spawn from a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    /// Intrinsic accuracy in percent; the fallback when attacking unarmed
    /// and the base for melee strikes.
    pub aim: i32,
    /// Intrinsic damage for unarmed/melee strikes.
    pub base_damage: u32,
    /// Base critical chance in percent.
    pub crit_chance: i32,
    /// Critical damage multiplier in hundredths (150 = 1.5x).
    pub crit_multiplier: u32,
    /// Tiles reachable with one move action.
    pub mobility: u32,
    /// Maximum attack distance without a weapon (melee reach).
    pub attack_range: u32,
    /// Sight distance in tiles; bounds overwatch and detection.
    pub view_range: u32,
    /// Turn-order key; higher acts earlier.
    pub initiative: i32,
    /// Percent chance that an overwatch trigger actually fires.
    pub overwatch_chance: u8,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            aim: 65,
            base_damage: 3,
            crit_chance: 10,
            crit_multiplier: 150,
            mobility: 8,
            attack_range: 1,
            view_range: 14,
            initiative: 10,
            overwatch_chance: 70,
        }
    }
}

bitflags! {
    /// Passive abilities granted by training or equipment.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AbilityFlags: u16 {
        /// Attack targets any tile an ally can see, at extended range.
        const SQUAD_SIGHT = 1 << 0;
        /// Free melee strike against enemies that move adjacent.
        const BLADESTORM = 1 << 1;
        /// Mission-critical unit that must reach the extraction zone.
        const VIP = 1 << 2;
    }
}

/// Reactive state machine per unit.
///
/// `Watching` is entered by the overwatch action, consumed by firing, and
/// cleared at the owner's next turn start. `BladestormArmed` persists for
/// as long as the unit keeps the ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionState {
    #[default]
    Idle,
    /// On overwatch; fires one reaction shot at the first enemy move it
    /// catches.
    Watching,
    /// Bladestorm ready; strikes enemies that move adjacent, without
    /// spending action points.
    BladestormArmed,
}

/// Complete mutable state of one unit.
///
/// # Invariants
///
/// - `health.current <= health.max` at all times
/// - `health.current == 0` means dead: excluded from targeting, turn order,
///   and reaction sweeps
/// - a stabilized unit never drops below 1 health from damage
///
/// Use the helper methods (`take_damage`, `spend_action_points`,
/// `break_concealment`) rather than writing fields directly; they keep the
/// invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    /// Display name. Never used as an address; lookups go through `UnitId`.
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    pub health: HealthMeter,
    pub action_points: ActionPoints,
    pub max_action_points: ActionPoints,
    pub stats: UnitStats,

    /// Equipped weapon: a shared reference into the session weapon table.
    pub weapon: Option<WeaponHandle>,
    /// Rounds left in the equipped weapon's magazine.
    pub ammo: AmmoState,
    /// Worn armor, owned by this unit alone.
    pub armor: Option<Armor>,

    /// Hidden from enemy targeting until broken by an action or detection.
    pub concealed: bool,
    /// Stacks of covering fire currently pinning this unit.
    pub suppression: u8,
    pub status_effects: StatusLedger,
    pub abilities: AbilityFlags,
    pub reaction: ReactionState,

    /// Field-medic stabilization: damage pins health at 1 instead of
    /// killing.
    pub stabilized: bool,
    /// Reached the extraction zone and left the field.
    pub extracted: bool,
}

impl UnitState {
    pub fn new(id: UnitId, name: impl Into<String>, faction: Faction, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            faction,
            position,
            health: HealthMeter::at_max(10),
            action_points: ActionPoints::from_points(2),
            max_action_points: ActionPoints::from_points(2),
            stats: UnitStats::default(),
            weapon: None,
            ammo: AmmoState::default(),
            armor: None,
            concealed: false,
            suppression: 0,
            status_effects: StatusLedger::empty(),
            abilities: AbilityFlags::empty(),
            reaction: ReactionState::Idle,
            stabilized: false,
            extracted: false,
        }
    }

    /// Quick liveness check. Extracted units count as off the field but
    /// not dead.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.current > 0
    }

    /// Alive, on the field, and targetable/schedulable.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.extracted
    }

    /// Whether this unit may take an action right now: alive, has action
    /// points, and no status effect blocks acting.
    pub fn can_act(&self) -> bool {
        self.is_active()
            && !self.action_points.is_empty()
            && !self.status_effects.blocks_action()
    }

    /// Applies damage, honoring stabilization pinning. Returns the damage
    /// actually applied.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        debug_assert!(self.health.current <= self.health.max);

        let floor = if self.stabilized { 1 } else { 0 };
        let new_health = self.health.current.saturating_sub(damage).max(floor);
        let applied = self.health.current - new_health;
        self.health.current = new_health;
        applied
    }

    /// Heals up to the maximum. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let new_health = (self.health.current + amount).min(self.health.max);
        let restored = new_health - self.health.current;
        self.health.current = new_health;
        restored
    }

    /// Pins a downed-but-stabilized unit at one health and marks it
    /// stabilized for future damage.
    pub fn stabilize(&mut self) {
        self.stabilized = true;
        if self.health.current == 0 {
            self.health.current = 1;
        }
    }

    /// Spends action points; saturates at zero.
    pub fn spend_action_points(&mut self, cost: ActionPoints) -> ActionPoints {
        self.action_points.spend(cost)
    }

    /// Restores action points to the per-turn default.
    pub fn reset_action_points(&mut self) {
        self.action_points = self.max_action_points;
    }

    /// Drops concealment (firing, detection).
    pub fn break_concealment(&mut self) {
        self.concealed = false;
    }

    pub fn has_ability(&self, flag: AbilityFlags) -> bool {
        self.abilities.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_unit() -> UnitState {
        UnitState::new(UnitId(0), "Vega", Faction::Soldier, Position::new(0, 0))
    }

    #[test]
    fn take_damage_never_underflows() {
        let mut unit = test_unit();
        let applied = unit.take_damage(999);
        assert_eq!(applied, 10);
        assert_eq!(unit.health.current, 0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn stabilized_unit_pins_at_one_health() {
        let mut unit = test_unit();
        unit.stabilized = true;
        unit.take_damage(999);
        assert_eq!(unit.health.current, 1);
        assert!(unit.is_alive());
    }

    #[test]
    fn stabilize_revives_downed_unit_to_one() {
        let mut unit = test_unit();
        unit.take_damage(999);
        assert_eq!(unit.health.current, 0);
        unit.stabilize();
        assert_eq!(unit.health.current, 1);
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut unit = test_unit();
        unit.take_damage(4);
        assert_eq!(unit.heal(100), 4);
        assert_eq!(unit.health.current, unit.health.max);
    }

    #[test]
    fn cannot_act_without_action_points() {
        let mut unit = test_unit();
        assert!(unit.can_act());
        unit.action_points.spend_all();
        assert!(!unit.can_act());
    }

    #[test]
    fn stunned_unit_cannot_act() {
        use crate::state::types::status::StatusEffectKind;

        let mut unit = test_unit();
        unit.status_effects.add(StatusEffectKind::Stunned, 1, 0);
        assert!(!unit.can_act());
    }
}
