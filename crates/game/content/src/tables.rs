//! Stock balance tables.
//!
//! One struct holds every number the resolution pipeline consumes. The
//! defaults below are the shipping balance; hosts override them by loading
//! a `tables.toml` (see [`crate::loaders::TablesLoader`]).

use tactics_core::{
    AimClamp, AmmoKind, AmmoProfile, ApCost, CoverKind, FlankingRules, ShotKind, ShotProfile,
    StatusAimModifiers, StatusEffectKind, StatusProc, SuppressionRules, TablesOracle,
};

/// Per-shot-kind profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotProfiles {
    pub standard: ShotProfile,
    pub aimed: ShotProfile,
    pub rapid_fire: ShotProfile,
    pub pistol: ShotProfile,
    pub overwatch: ShotProfile,
    pub suppression: ShotProfile,
    pub melee: ShotProfile,
}

/// Aim penalty per cover tier (positive values, subtracted).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverPenalties {
    pub low: i32,
    pub half: i32,
    pub full: i32,
    pub deep: i32,
}

/// Per-ammo-kind profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoProfiles {
    pub standard: AmmoProfile,
    pub armor_piercing: AmmoProfile,
    pub incendiary: AmmoProfile,
    pub venom: AmmoProfile,
}

/// The complete balance table set, implementing [`TablesOracle`].
///
/// Deserialization falls back to the stock value for any omitted field,
/// so a `tables.toml` only has to name what it overrides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BalanceTables {
    pub shots: ShotProfiles,
    pub cover: CoverPenalties,
    pub status_modifiers: StatusAimModifiers,
    pub flanking: FlankingRules,
    pub ammo: AmmoProfiles,
    pub aim_clamp: AimClamp,
    pub height_bonus_per_level: i32,
    pub height_crit_bonus_per_level: i32,
    pub squad_sight_range_bonus: u32,
    pub suppression_effect: SuppressionRules,
    pub damage_floor: u32,
    pub throw_cost: ApCost,
    pub move_cost: ApCost,
    pub reload_cost: ApCost,
}

impl Default for BalanceTables {
    fn default() -> Self {
        Self {
            shots: ShotProfiles {
                standard: ShotProfile::new(0, 100, ApCost::AllRemaining),
                aimed: ShotProfile::new(15, 100, ApCost::AllRemaining),
                rapid_fire: ShotProfile::new(-15, 100, ApCost::AllRemaining),
                pistol: ShotProfile::new(0, 80, ApCost::Fixed(50)),
                overwatch: ShotProfile::reactive(-10, 100),
                suppression: ShotProfile::new(-20, 50, ApCost::AllRemaining),
                melee: ShotProfile::new(10, 120, ApCost::Fixed(100)),
            },
            cover: CoverPenalties {
                low: 15,
                half: 25,
                full: 40,
                deep: 50,
            },
            status_modifiers: StatusAimModifiers {
                poisoned_attacker: -20,
                disoriented_attacker: -15,
                suppressed_per_stack: -10,
                marked_target: 20,
            },
            flanking: FlankingRules {
                cover_penalty_factor: 0,
                crit_bonus: 25,
            },
            ammo: AmmoProfiles {
                standard: AmmoProfile::default(),
                armor_piercing: AmmoProfile {
                    armor_pierce: 2,
                    crit_bonus: 5,
                    ..AmmoProfile::default()
                },
                incendiary: AmmoProfile {
                    damage_bonus: 1,
                    proc: Some(StatusProc {
                        kind: StatusEffectKind::Burning,
                        chance: 30,
                        duration: 2,
                        intensity: 2,
                    }),
                    ..AmmoProfile::default()
                },
                venom: AmmoProfile {
                    damage_bonus: 1,
                    proc: Some(StatusProc {
                        kind: StatusEffectKind::Poisoned,
                        chance: 30,
                        duration: 3,
                        intensity: 2,
                    }),
                    ..AmmoProfile::default()
                },
            },
            aim_clamp: AimClamp {
                floor: 5,
                ceiling: 95,
            },
            height_bonus_per_level: 10,
            height_crit_bonus_per_level: 5,
            squad_sight_range_bonus: 10,
            suppression_effect: SuppressionRules {
                duration: 2,
                intensity: 0,
            },
            damage_floor: 1,
            throw_cost: ApCost::Fixed(100),
            move_cost: ApCost::Fixed(100),
            reload_cost: ApCost::Fixed(100),
        }
    }
}

impl TablesOracle for BalanceTables {
    fn shot_profile(&self, kind: ShotKind) -> ShotProfile {
        match kind {
            ShotKind::Standard => self.shots.standard,
            ShotKind::Aimed => self.shots.aimed,
            ShotKind::RapidFire => self.shots.rapid_fire,
            ShotKind::Pistol => self.shots.pistol,
            ShotKind::Overwatch => self.shots.overwatch,
            ShotKind::Suppression => self.shots.suppression,
            ShotKind::Melee => self.shots.melee,
        }
    }

    fn cover_penalty(&self, cover: CoverKind) -> i32 {
        match cover {
            CoverKind::None => 0,
            CoverKind::Low => self.cover.low,
            CoverKind::Half => self.cover.half,
            CoverKind::Full => self.cover.full,
            CoverKind::Deep => self.cover.deep,
        }
    }

    fn status_modifiers(&self) -> StatusAimModifiers {
        self.status_modifiers
    }

    fn flanking(&self) -> FlankingRules {
        self.flanking
    }

    fn ammo_profile(&self, kind: AmmoKind) -> AmmoProfile {
        match kind {
            AmmoKind::Standard => self.ammo.standard,
            AmmoKind::ArmorPiercing => self.ammo.armor_piercing,
            AmmoKind::Incendiary => self.ammo.incendiary,
            AmmoKind::Venom => self.ammo.venom,
        }
    }

    fn aim_clamp(&self) -> AimClamp {
        self.aim_clamp
    }

    fn height_bonus_per_level(&self) -> i32 {
        self.height_bonus_per_level
    }

    fn height_crit_bonus_per_level(&self) -> i32 {
        self.height_crit_bonus_per_level
    }

    fn squad_sight_range_bonus(&self) -> u32 {
        self.squad_sight_range_bonus
    }

    fn suppression_effect(&self) -> SuppressionRules {
        self.suppression_effect
    }

    fn damage_floor(&self) -> u32 {
        self.damage_floor
    }

    fn throw_cost(&self) -> ApCost {
        self.throw_cost
    }

    fn move_cost(&self) -> ApCost {
        self.move_cost
    }

    fn reload_cost(&self) -> ApCost {
        self.reload_cost
    }
}
