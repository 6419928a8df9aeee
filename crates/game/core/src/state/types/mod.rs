pub mod common;
pub mod destructible;
pub mod equipment;
pub mod status;
pub mod unit;

// Re-export common types
pub use common::{ActionPoints, Faction, Position, UnitId};

// Re-export destructible environment types
pub use destructible::{DestructibleId, DestructibleState};

// Re-export equipment types
pub use equipment::{
    AmmoKind, AmmoState, Armor, Explosive, ExplosiveHandle, RangeMetric, StatusProc, Weapon,
    WeaponClass, WeaponHandle,
};

// Re-export status effect types
pub use status::{EffectProfile, StatusEffect, StatusEffectKind, StatusLedger, TickOutcome};

// Re-export unit state types
pub use unit::{AbilityFlags, HealthMeter, ReactionState, UnitState, UnitStats};
