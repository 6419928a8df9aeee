//! Static catalog oracle: stat-block lookup by type key.
//!
//! Weapons, armor, explosives, and unit templates are read-only data
//! supplied by the host (see `tactics-content` for the stock catalog).
//! The core treats everything returned here as an immutable value object.

use crate::state::{
    AbilityFlags, Armor, Explosive, Faction, HealthMeter, Position, StatusLedger, UnitId,
    UnitState, UnitStats, Weapon,
};

/// Read-only stat-block lookup by type key.
///
/// Keys are catalog identifiers ("assault_rifle", "sectoid"), not display
/// names; the core resolves them once at setup and works with handles
/// afterwards.
pub trait CatalogOracle: Send + Sync {
    fn weapon(&self, key: &str) -> Option<Weapon>;
    fn armor(&self, key: &str) -> Option<Armor>;
    fn explosive(&self, key: &str) -> Option<Explosive>;
    fn unit_template(&self, key: &str) -> Option<UnitTemplate>;
}

/// Unit template defining everything but id and position.
///
/// Serializable from data files; spawned into `UnitState` at mission
/// setup. Weapon and armor are referenced by catalog key and resolved
/// when the session wires the unit up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub faction: Faction,
    pub max_health: u32,
    pub stats: UnitStats,
    pub abilities: AbilityFlags,
    /// Action points per turn, in centipoints.
    pub action_points: u16,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    /// Soldiers may start missions concealed.
    pub concealed: bool,
}

impl UnitTemplate {
    /// Create a builder for constructing unit templates.
    pub fn builder(name: impl Into<String>) -> UnitTemplateBuilder {
        UnitTemplateBuilder::new(name)
    }

    /// Instantiate this template at a position. Equipment keys are not
    /// resolved here; the session equips the unit against its catalog.
    pub fn to_unit(&self, id: UnitId, position: Position) -> UnitState {
        let mut unit = UnitState::new(id, self.name.clone(), self.faction, position);
        unit.health = HealthMeter::at_max(self.max_health);
        unit.stats = self.stats;
        unit.abilities = self.abilities;
        unit.action_points = crate::state::ActionPoints::new(self.action_points);
        unit.max_action_points = unit.action_points;
        unit.concealed = self.concealed;
        unit.status_effects = StatusLedger::empty();
        unit
    }
}

/// Builder for constructing unit templates.
pub struct UnitTemplateBuilder {
    template: UnitTemplate,
}

impl UnitTemplateBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            template: UnitTemplate {
                name: name.into(),
                faction: Faction::Soldier,
                max_health: 10,
                stats: UnitStats::default(),
                abilities: AbilityFlags::empty(),
                action_points: crate::config::CombatConfig::DEFAULT_ACTION_POINTS,
                weapon: None,
                armor: None,
                concealed: false,
            },
        }
    }

    pub fn faction(mut self, faction: Faction) -> Self {
        self.template.faction = faction;
        self
    }

    pub fn max_health(mut self, max_health: u32) -> Self {
        self.template.max_health = max_health;
        self
    }

    pub fn stats(mut self, stats: UnitStats) -> Self {
        self.template.stats = stats;
        self
    }

    pub fn abilities(mut self, abilities: AbilityFlags) -> Self {
        self.template.abilities = abilities;
        self
    }

    pub fn action_points(mut self, centipoints: u16) -> Self {
        self.template.action_points = centipoints;
        self
    }

    pub fn weapon(mut self, key: impl Into<String>) -> Self {
        self.template.weapon = Some(key.into());
        self
    }

    pub fn armor(mut self, key: impl Into<String>) -> Self {
        self.template.armor = Some(key.into());
        self
    }

    pub fn concealed(mut self, concealed: bool) -> Self {
        self.template.concealed = concealed;
        self
    }

    pub fn build(self) -> UnitTemplate {
        self.template
    }
}
