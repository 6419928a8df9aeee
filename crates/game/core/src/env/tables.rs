use crate::combat::ShotKind;
use crate::env::field::CoverKind;
use crate::state::{AmmoKind, StatusProc};

/// Oracle providing combat rules and balance tables.
///
/// Every number the resolution pipeline adds, subtracts, or multiplies
/// comes through here: shot-kind modifiers, cover penalties, status
/// modifiers, the clamp window. The pipeline itself carries no literals,
/// so rebalancing is a data change.
pub trait TablesOracle: Send + Sync {
    fn shot_profile(&self, kind: ShotKind) -> ShotProfile;
    fn cover_penalty(&self, cover: CoverKind) -> i32;
    fn status_modifiers(&self) -> StatusAimModifiers;
    fn flanking(&self) -> FlankingRules;
    fn ammo_profile(&self, kind: AmmoKind) -> AmmoProfile;
    fn aim_clamp(&self) -> AimClamp;

    /// Aim bonus per level of height advantage over the target.
    fn height_bonus_per_level(&self) -> i32;

    /// Critical chance bonus per level of height advantage.
    fn height_crit_bonus_per_level(&self) -> i32;

    /// Extra attack range granted by squad sight when an ally spots the
    /// target.
    fn squad_sight_range_bonus(&self) -> u32;

    /// The status applied to the target of a suppression shot.
    fn suppression_effect(&self) -> SuppressionRules;

    /// Minimum damage dealt by any successful hit.
    fn damage_floor(&self) -> u32;

    /// Action-point price of throwing an explosive.
    fn throw_cost(&self) -> ApCost;

    /// Action-point price of one move action.
    fn move_cost(&self) -> ApCost;

    /// Action-point price of reloading the equipped weapon.
    fn reload_cost(&self) -> ApCost;
}

/// Action-point price of taking a shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApCost {
    /// Firing ends the unit's turn regardless of points left.
    AllRemaining,
    /// Fixed price in centipoints (50 = half a point).
    Fixed(u16),
}

/// Per-shot-kind tuning applied in the resolution pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotProfile {
    /// Added to base accuracy (aimed shots +, snap fire -).
    pub aim_modifier: i32,
    /// Damage multiplier in hundredths (100 = unchanged).
    pub damage_multiplier: u32,
    pub ap_cost: ApCost,
    /// Reaction shots fire out of turn and were paid for when the watch
    /// state was set; they skip the action-point precondition.
    pub requires_action_points: bool,
}

impl ShotProfile {
    pub const fn new(aim_modifier: i32, damage_multiplier: u32, ap_cost: ApCost) -> Self {
        Self {
            aim_modifier,
            damage_multiplier,
            ap_cost,
            requires_action_points: true,
        }
    }

    pub const fn reactive(aim_modifier: i32, damage_multiplier: u32) -> Self {
        Self {
            aim_modifier,
            damage_multiplier,
            ap_cost: ApCost::Fixed(0),
            requires_action_points: false,
        }
    }
}

/// Additive aim modifiers from status effects, spec'd as configuration
/// rather than literals in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusAimModifiers {
    /// Penalty while the attacker is poisoned.
    pub poisoned_attacker: i32,
    /// Penalty while the attacker is disoriented.
    pub disoriented_attacker: i32,
    /// Penalty per suppression stack on the attacker.
    pub suppressed_per_stack: i32,
    /// Bonus against a marked target.
    pub marked_target: i32,
}

/// What flanking does to the cover math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlankingRules {
    /// Fraction of the cover penalty that still applies when flanked,
    /// in hundredths (0 = cover ignored entirely).
    pub cover_penalty_factor: u32,
    /// Critical chance bonus for the flanking attacker.
    pub crit_bonus: i32,
}

/// Modifiers granted by a specialty ammunition type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoProfile {
    pub damage_bonus: u32,
    /// Armor reduction ignored by the round.
    pub armor_pierce: u32,
    pub crit_bonus: i32,
    /// Status roll added on hit, independent of weapon procs.
    pub proc: Option<StatusProc>,
}

/// Final hit chance window; no shot is a guaranteed hit or miss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AimClamp {
    pub floor: i32,
    pub ceiling: i32,
}

impl AimClamp {
    pub fn apply(&self, chance: i32) -> i32 {
        chance.clamp(self.floor, self.ceiling)
    }
}

/// Status payload of a suppression shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuppressionRules {
    pub duration: u8,
    pub intensity: u16,
}
