//! Authoritative combat state representation.
//!
//! This module owns the data structures that describe units, equipment,
//! destructible objects, and turn bookkeeping. Runtime layers clone or
//! query this state but mutate it exclusively through the engine and the
//! resolution pipeline.

pub mod turn;
pub mod types;

use crate::mission::MissionState;

pub use turn::{Phase, TurnState};
pub use types::{
    AbilityFlags, ActionPoints, AmmoKind, AmmoState, Armor, DestructibleId, DestructibleState,
    EffectProfile, Explosive, ExplosiveHandle, Faction, HealthMeter, Position, RangeMetric,
    ReactionState, StatusEffect, StatusEffectKind, StatusLedger, StatusProc, TickOutcome, UnitId,
    UnitState, UnitStats, Weapon, WeaponClass, WeaponHandle,
};

/// Canonical snapshot of one combat session's deterministic state.
///
/// Units, weapons, and destructibles live in arenas addressed by their
/// index-typed ids; nothing in the core is keyed by display name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// RNG seed for the whole session. Set once at setup and never
    /// modified; combined with `turn.nonce` for every random draw.
    pub session_seed: u64,

    /// Unit arena; `UnitId(n)` is the index of the nth spawned unit.
    units: Vec<UnitState>,

    /// Shared weapon stat blocks. Units reference these by handle; the
    /// blocks themselves never change after setup.
    weapons: Vec<Weapon>,

    /// Explosive stat blocks referenced by destructible payloads and
    /// thrown charges.
    explosives: Vec<Explosive>,

    /// Destructible environment objects.
    pub destructibles: Vec<DestructibleState>,

    /// Turn bookkeeping including the active phase.
    pub turn: TurnState,

    /// Objectives and terminal status.
    pub mission: MissionState,
}

impl CombatState {
    /// Creates an empty state with the given session seed.
    pub fn new(session_seed: u64) -> Self {
        Self {
            session_seed,
            units: Vec::new(),
            weapons: Vec::new(),
            explosives: Vec::new(),
            destructibles: Vec::new(),
            turn: TurnState::new(),
            mission: MissionState::default(),
        }
    }

    pub fn with_mission(mut self, mission: MissionState) -> Self {
        self.mission = mission;
        self
    }

    // ========================================================================
    // Units
    // ========================================================================

    /// Adds a unit to the arena, assigning the next id. Returns the id.
    pub fn spawn_unit(&mut self, mut unit: UnitState) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        unit.id = id;
        self.units.push(unit);
        id
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitState> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitState> {
        self.units.get_mut(id.index())
    }

    pub fn units(&self) -> &[UnitState] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [UnitState] {
        &mut self.units
    }

    /// Living, on-field units in id order.
    pub fn active_units(&self) -> impl Iterator<Item = &UnitState> {
        self.units.iter().filter(|u| u.is_active())
    }

    /// The living unit standing on `position`, if any.
    pub fn active_unit_at(&self, position: Position) -> Option<&UnitState> {
        self.active_units()
            .find(|u| u.position.x == position.x && u.position.y == position.y)
    }

    /// True when no living player-controlled unit has action points left.
    pub fn soldiers_spent(&self) -> bool {
        !self
            .active_units()
            .any(|u| u.faction.is_player_controlled() && u.can_act())
    }

    /// Ids of living AI-controlled units, in this turn's initiative order.
    pub fn enemy_roster(&self) -> Vec<UnitId> {
        self.turn
            .order
            .iter()
            .copied()
            .filter(|&id| {
                self.unit(id)
                    .is_some_and(|u| u.is_active() && !u.faction.is_player_controlled())
            })
            .collect()
    }

    /// Initiative order over the living roster: strict descending
    /// initiative, ties broken by ascending unit id.
    pub fn initiative_order(&self) -> Vec<UnitId> {
        let mut order: Vec<UnitId> = self.active_units().map(|u| u.id).collect();
        order.sort_by_key(|&id| {
            let unit = &self.units[id.index()];
            (core::cmp::Reverse(unit.stats.initiative), id)
        });
        order
    }

    // ========================================================================
    // Weapons
    // ========================================================================

    /// Registers a weapon stat block in the shared table.
    pub fn register_weapon(&mut self, weapon: Weapon) -> WeaponHandle {
        let handle = WeaponHandle(self.weapons.len() as u16);
        self.weapons.push(weapon);
        handle
    }

    pub fn weapon(&self, handle: WeaponHandle) -> Option<&Weapon> {
        self.weapons.get(handle.index())
    }

    /// Equips a registered weapon on a unit and fills its magazine.
    pub fn equip_weapon(&mut self, unit: UnitId, handle: WeaponHandle) -> bool {
        let Some(capacity) = self.weapons.get(handle.index()).map(|w| w.ammo_capacity) else {
            return false;
        };
        let Some(unit) = self.units.get_mut(unit.index()) else {
            return false;
        };
        unit.weapon = Some(handle);
        unit.ammo = AmmoState::full(capacity);
        true
    }

    /// Refills the magazine of the unit's equipped weapon, keeping the
    /// loaded ammo kind.
    pub fn reload_weapon(&mut self, unit: UnitId) -> bool {
        let Some(handle) = self.units.get(unit.index()).and_then(|u| u.weapon) else {
            return false;
        };
        let capacity = self.weapons[handle.index()].ammo_capacity;
        let kind = self.units[unit.index()].ammo.kind;
        self.units[unit.index()].ammo = AmmoState::full(capacity).with_kind(kind);
        true
    }

    // ========================================================================
    // Explosives
    // ========================================================================

    /// Registers an explosive stat block for later reference by handle.
    pub fn register_explosive(&mut self, explosive: Explosive) -> ExplosiveHandle {
        let handle = ExplosiveHandle(self.explosives.len() as u16);
        self.explosives.push(explosive);
        handle
    }

    pub fn explosive(&self, handle: ExplosiveHandle) -> Option<&Explosive> {
        self.explosives.get(handle.0 as usize)
    }

    // ========================================================================
    // Destructibles
    // ========================================================================

    pub fn add_destructible(&mut self, mut destructible: DestructibleState) -> DestructibleId {
        let id = DestructibleId(self.destructibles.len() as u16);
        destructible.id = id;
        self.destructibles.push(destructible);
        id
    }

    /// The first intact destructible on `position`, if any.
    pub fn destructible_at_mut(&mut self, position: Position) -> Option<&mut DestructibleState> {
        self.destructibles
            .iter_mut()
            .find(|d| !d.is_destroyed() && d.position.x == position.x && d.position.y == position.y)
    }
}
