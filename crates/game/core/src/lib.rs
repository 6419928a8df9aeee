//! Deterministic tactical combat core.
//!
//! `tactics-core` defines the canonical combat rules: unit state, the
//! status effect ledger, the attack resolution pipeline, reactive
//! triggers, the phase scheduler, and mission tracking. Everything is
//! pure with respect to its oracle inputs; supporting crates depend on
//! the types re-exported here and drive the state exclusively through
//! [`engine::CombatEngine`] and the resolution functions.

pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod mission;
pub mod reaction;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use combat::{
    AreaAttackResult, AreaHit, AttackBlocked, AttackContext, AttackOutcome, CombatError,
    CombatResult, ShotKind, can_attack, detonate, resolve_attack,
};
pub use config::CombatConfig;
pub use engine::{CombatEngine, EnvironmentReport, PhaseError, PhaseOutcome, UnitTick};
pub use env::{
    AimClamp, AmmoProfile, ApCost, CatalogOracle, CombatEnv, CoverKind, Env, FieldOracle,
    FlankingRules, OpenField, OracleError, PcgRng, RngOracle, ShotProfile, StatusAimModifiers,
    SuppressionRules, TablesOracle, UnitTemplate, UnitTemplateBuilder, compute_seed,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use mission::{
    MissionKind, MissionState, MissionStatus, Objective, ObjectiveCondition, Zone,
    evaluate_mission,
};
pub use reaction::{
    ReactionShot, arm_bladestorm, clear_overwatch_for_side, enter_overwatch, on_unit_moved,
};
pub use state::{
    AbilityFlags, ActionPoints, AmmoKind, AmmoState, Armor, CombatState, DestructibleId,
    DestructibleState, Explosive, ExplosiveHandle, Faction, HealthMeter, Phase, Position,
    RangeMetric, ReactionState, StatusEffect, StatusEffectKind, StatusLedger, StatusProc,
    TurnState, UnitId, UnitState, UnitStats, Weapon, WeaponClass, WeaponHandle,
};
