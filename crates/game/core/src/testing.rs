//! Shared fixtures for the crate's unit tests.

use crate::combat::ShotKind;
use crate::env::{
    AimClamp, AmmoProfile, ApCost, CombatEnv, CoverKind, Env, FieldOracle, FlankingRules,
    OpenField, RngOracle, ShotProfile, StatusAimModifiers, SuppressionRules, TablesOracle,
};
use crate::state::{
    AmmoKind, Explosive, RangeMetric, StatusEffectKind, StatusProc, Weapon, WeaponClass,
};

/// Balance tables with the stock numbers: full cover -40, +10 aim per
/// height level, clamp 5..95.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestTables;

impl TablesOracle for TestTables {
    fn shot_profile(&self, kind: ShotKind) -> ShotProfile {
        match kind {
            ShotKind::Standard => ShotProfile::new(0, 100, ApCost::AllRemaining),
            ShotKind::Aimed => ShotProfile::new(15, 100, ApCost::AllRemaining),
            ShotKind::RapidFire => ShotProfile::new(-15, 100, ApCost::AllRemaining),
            ShotKind::Pistol => ShotProfile::new(0, 80, ApCost::Fixed(50)),
            ShotKind::Overwatch => ShotProfile::reactive(-10, 100),
            ShotKind::Suppression => ShotProfile::new(-20, 50, ApCost::AllRemaining),
            ShotKind::Melee => ShotProfile::new(10, 120, ApCost::Fixed(100)),
        }
    }

    fn cover_penalty(&self, cover: CoverKind) -> i32 {
        match cover {
            CoverKind::None => 0,
            CoverKind::Low => 15,
            CoverKind::Half => 25,
            CoverKind::Full => 40,
            CoverKind::Deep => 50,
        }
    }

    fn status_modifiers(&self) -> StatusAimModifiers {
        StatusAimModifiers {
            poisoned_attacker: -20,
            disoriented_attacker: -15,
            suppressed_per_stack: -10,
            marked_target: 20,
        }
    }

    fn flanking(&self) -> FlankingRules {
        FlankingRules {
            cover_penalty_factor: 0,
            crit_bonus: 25,
        }
    }

    fn ammo_profile(&self, kind: AmmoKind) -> AmmoProfile {
        match kind {
            AmmoKind::Standard => AmmoProfile::default(),
            AmmoKind::ArmorPiercing => AmmoProfile {
                armor_pierce: 2,
                crit_bonus: 5,
                ..AmmoProfile::default()
            },
            AmmoKind::Incendiary => AmmoProfile {
                damage_bonus: 1,
                proc: Some(StatusProc {
                    kind: StatusEffectKind::Burning,
                    chance: 30,
                    duration: 2,
                    intensity: 2,
                }),
                ..AmmoProfile::default()
            },
            AmmoKind::Venom => AmmoProfile {
                damage_bonus: 1,
                proc: Some(StatusProc {
                    kind: StatusEffectKind::Poisoned,
                    chance: 30,
                    duration: 3,
                    intensity: 2,
                }),
                ..AmmoProfile::default()
            },
        }
    }

    fn aim_clamp(&self) -> AimClamp {
        AimClamp {
            floor: 5,
            ceiling: 95,
        }
    }

    fn height_bonus_per_level(&self) -> i32 {
        10
    }

    fn height_crit_bonus_per_level(&self) -> i32 {
        5
    }

    fn squad_sight_range_bonus(&self) -> u32 {
        10
    }

    fn suppression_effect(&self) -> SuppressionRules {
        SuppressionRules {
            duration: 2,
            intensity: 0,
        }
    }

    fn damage_floor(&self) -> u32 {
        1
    }

    fn throw_cost(&self) -> ApCost {
        ApCost::Fixed(100)
    }

    fn move_cost(&self) -> ApCost {
        ApCost::Fixed(100)
    }

    fn reload_cost(&self) -> ApCost {
        ApCost::Fixed(100)
    }
}

/// Rng whose d100 always lands on a chosen value.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng {
    pub roll: u32,
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.roll - 1
    }
}

/// Every chance check succeeds.
#[derive(Clone, Copy, Debug)]
pub struct AlwaysRng;

impl RngOracle for AlwaysRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        0
    }

    fn chance(&self, _seed: u64, _percent: i32) -> bool {
        true
    }
}

/// Every chance check fails.
#[derive(Clone, Copy, Debug)]
pub struct NeverRng;

impl RngOracle for NeverRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        99
    }

    fn chance(&self, _seed: u64, _percent: i32) -> bool {
        false
    }
}

/// Oracle bundle over open ground with the test tables.
pub struct TestEnv {
    pub field: OpenField,
    pub tables: TestTables,
    rng: Box<dyn RngOracle>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self {
            field: OpenField::new(64, 64),
            tables: TestTables,
            rng: Box::new(crate::env::PcgRng),
        }
    }
}

impl TestEnv {
    pub fn with_rng(rng: impl RngOracle + 'static) -> Self {
        Self {
            rng: Box::new(rng),
            ..Self::default()
        }
    }

    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::new(
            Some(&self.field as &dyn FieldOracle),
            Some(&self.tables as &dyn TablesOracle),
            None,
            Some(self.rng.as_ref()),
        )
    }
}

/// Stock test rifle: 4 damage, 75 accuracy, 10 range, 3-round magazine.
pub fn rifle() -> Weapon {
    Weapon {
        name: "test_rifle".into(),
        class: WeaponClass::Primary,
        damage: 4,
        accuracy: 75,
        range: 10,
        range_metric: RangeMetric::Manhattan,
        ammo_capacity: 3,
        crit_bonus: 0,
        on_hit: Default::default(),
    }
}

/// Stock test grenade: 25 damage, radius 3, 30% falloff floor.
pub fn frag_grenade() -> Explosive {
    Explosive {
        name: "frag".into(),
        damage: 25,
        radius: 3,
        floor_factor: 30,
        chain_chance: 0,
    }
}
