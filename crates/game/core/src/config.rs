/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Whether the enemy phase runs AI at all. When false the scheduler
    /// passes straight from the soldier phase to the environment phase.
    pub ai_enabled: bool,

    /// Action points granted to every living unit at turn start,
    /// in centipoints (100 = one full point).
    pub default_action_points: u16,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum simultaneous status effects per unit.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum on-hit status procs carried by one weapon.
    pub const MAX_STATUS_PROCS: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINTS: u16 = 200;

    pub fn new() -> Self {
        Self {
            ai_enabled: true,
            default_action_points: Self::DEFAULT_ACTION_POINTS,
        }
    }

    pub fn with_ai_disabled() -> Self {
        Self {
            ai_enabled: false,
            ..Self::new()
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
