//! Combat session: the synchronous orchestrator around the core.
//!
//! One session owns one battle: the combat state, the oracle bundle, the
//! enemy AI, and the event log. Every public operation runs on the
//! caller's thread and mutates state only through the core's resolution
//! functions and the phase engine, so a session can be torn down between
//! turns without leaving partial writes behind.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tactics_core::{
    AttackBlocked, AttackContext, AreaAttackResult, CombatConfig, CombatEngine, CombatEnv,
    CombatResult, CombatState, DestructibleId, DestructibleState, Env, ExplosiveHandle,
    FieldOracle, MissionState, MissionStatus, OpenField, PcgRng, Phase, Position, RngOracle,
    ShotKind, TablesOracle, UnitId, UnitState, WeaponHandle,
};
use tactics_core::{ApCost, CatalogOracle};
use tactics_core::{can_attack, detonate, enter_overwatch, on_unit_moved, resolve_attack};
use tactics_content::{BalanceTables, Catalog};

use crate::ai::EnemyAi;
use crate::error::SessionError;
use crate::events::{CombatEvent, EventLog};

/// Outcome of a grenade throw: either it went off, or the throw itself
/// was disallowed. Both are ordinary game flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ThrowOutcome {
    Detonated(AreaAttackResult),
    Blocked(AttackBlocked),
}

/// Bundles the session's oracle references for the core.
fn make_env<'a>(
    field: &'a dyn FieldOracle,
    tables: &'a dyn TablesOracle,
    catalog: &'a dyn CatalogOracle,
    rng: &'a dyn RngOracle,
) -> CombatEnv<'a> {
    Env::new(Some(field), Some(tables), Some(catalog), Some(rng))
}

/// A single combat encounter, driven synchronously by its host.
pub struct CombatSession {
    state: CombatState,
    config: CombatConfig,
    field: Box<dyn FieldOracle>,
    tables: Box<dyn TablesOracle>,
    catalog: Box<dyn CatalogOracle>,
    rng: Box<dyn RngOracle>,
    ai: Option<Box<dyn EnemyAi>>,
    events: EventLog,
    weapon_handles: HashMap<String, WeaponHandle>,
    explosive_handles: HashMap<String, ExplosiveHandle>,
}

impl CombatSession {
    /// Create a session builder.
    pub fn builder() -> CombatSessionBuilder {
        CombatSessionBuilder::new()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    /// Spawns a unit from a catalog template, resolving its equipment
    /// keys against the catalog.
    pub fn spawn_from_template(
        &mut self,
        key: &str,
        position: Position,
    ) -> Result<UnitId, SessionError> {
        let template = self
            .catalog
            .unit_template(key)
            .ok_or_else(|| SessionError::UnknownCatalogKey(key.to_owned()))?;

        let mut unit = template.to_unit(UnitId(0), position);

        if let Some(armor_key) = &template.armor {
            unit.armor = Some(
                self.catalog
                    .armor(armor_key)
                    .ok_or_else(|| SessionError::UnknownCatalogKey(armor_key.clone()))?,
            );
        }

        let id = self.state.spawn_unit(unit);

        if let Some(weapon_key) = &template.weapon {
            let handle = self.weapon_handle(weapon_key)?;
            self.state.equip_weapon(id, handle);
        }

        self.state.turn.order = self.state.initiative_order();
        tracing::debug!(unit = %id, template = key, "unit spawned");
        Ok(id)
    }

    /// Spawns a fully constructed unit.
    pub fn spawn_unit(&mut self, unit: UnitState) -> UnitId {
        let id = self.state.spawn_unit(unit);
        self.state.turn.order = self.state.initiative_order();
        id
    }

    /// Equips a catalog weapon on a unit, filling its magazine.
    pub fn equip_from_catalog(&mut self, unit: UnitId, key: &str) -> Result<(), SessionError> {
        let handle = self.weapon_handle(key)?;
        if !self.state.equip_weapon(unit, handle) {
            return Err(SessionError::UnknownUnit(unit));
        }
        Ok(())
    }

    /// Places a destructible object, optionally carrying an explosive
    /// payload from the catalog.
    pub fn place_destructible(
        &mut self,
        position: Position,
        health: u32,
        payload: Option<&str>,
    ) -> Result<DestructibleId, SessionError> {
        let mut object = DestructibleState::new(DestructibleId(0), position, health);
        if let Some(key) = payload {
            object.payload = Some(self.explosive_handle(key)?);
        }
        Ok(self.state.add_destructible(object))
    }

    fn weapon_handle(&mut self, key: &str) -> Result<WeaponHandle, SessionError> {
        if let Some(handle) = self.weapon_handles.get(key) {
            return Ok(*handle);
        }
        let weapon = self
            .catalog
            .weapon(key)
            .ok_or_else(|| SessionError::UnknownCatalogKey(key.to_owned()))?;
        let handle = self.state.register_weapon(weapon);
        self.weapon_handles.insert(key.to_owned(), handle);
        Ok(handle)
    }

    fn explosive_handle(&mut self, key: &str) -> Result<ExplosiveHandle, SessionError> {
        if let Some(handle) = self.explosive_handles.get(key) {
            return Ok(*handle);
        }
        let explosive = self
            .catalog
            .explosive(key)
            .ok_or_else(|| SessionError::UnknownCatalogKey(key.to_owned()))?;
        let handle = self.state.register_explosive(explosive);
        self.explosive_handles.insert(key.to_owned(), handle);
        Ok(handle)
    }

    // ========================================================================
    // Combat operations
    // ========================================================================

    /// Resolves a single-target attack. Disallowed attempts come back as
    /// blocked results, never errors.
    pub fn resolve_attack(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        shot: ShotKind,
    ) -> Result<CombatResult, SessionError> {
        self.ensure_in_progress()?;

        let env = make_env(
            self.field.as_ref(),
            self.tables.as_ref(),
            self.catalog.as_ref(),
            self.rng.as_ref(),
        );
        let ctx = AttackContext::derive(&self.state, attacker, target, &env)?;
        let result = resolve_attack(&mut self.state, attacker, target, shot, &ctx, &env)?;

        tracing::debug!(%attacker, %target, %shot, outcome = result.message(), "attack resolved");
        self.events.push(CombatEvent::AttackResolved {
            attacker,
            target,
            kind: shot,
            result: result.clone(),
        });
        if result.success() {
            self.note_if_killed(target);
        }

        Ok(result)
    }

    /// Dry-run check for AI/UI callers: could this attack be taken now?
    pub fn can_attack(
        &self,
        attacker: UnitId,
        target: UnitId,
        shot: ShotKind,
    ) -> Result<bool, SessionError> {
        let env = make_env(
            self.field.as_ref(),
            self.tables.as_ref(),
            self.catalog.as_ref(),
            self.rng.as_ref(),
        );
        Ok(can_attack(&self.state, attacker, target, shot, &env)?)
    }

    /// Throws a catalog explosive at a point.
    pub fn throw_explosive(
        &mut self,
        thrower: UnitId,
        impact: Position,
        key: &str,
    ) -> Result<ThrowOutcome, SessionError> {
        self.ensure_in_progress()?;

        let explosive = self
            .catalog
            .explosive(key)
            .ok_or_else(|| SessionError::UnknownCatalogKey(key.to_owned()))?;

        let Some(unit) = self.state.unit(thrower) else {
            return Err(SessionError::UnknownUnit(thrower));
        };
        if !unit.can_act() {
            return Ok(ThrowOutcome::Blocked(AttackBlocked::CannotAct));
        }
        if unit.position.euclidean_distance(&impact) > unit.stats.view_range {
            return Ok(ThrowOutcome::Blocked(AttackBlocked::OutOfRange));
        }

        let throw_cost = self.tables.throw_cost();
        {
            let unit = self
                .state
                .unit_mut(thrower)
                .ok_or(SessionError::UnknownUnit(thrower))?;
            match throw_cost {
                ApCost::AllRemaining => {
                    unit.action_points.spend_all();
                }
                ApCost::Fixed(centipoints) => {
                    unit.spend_action_points(tactics_core::ActionPoints::new(centipoints));
                }
            }
            unit.break_concealment();
        }

        let env = make_env(
            self.field.as_ref(),
            self.tables.as_ref(),
            self.catalog.as_ref(),
            self.rng.as_ref(),
        );
        let result = detonate(&mut self.state, impact, &explosive, &env)?;

        tracing::debug!(%thrower, explosive = key, hits = result.hits.len(), "explosive thrown");
        for hit in &result.hits {
            self.note_if_killed(hit.unit);
        }
        self.events.push(CombatEvent::ExplosiveDetonated {
            result: result.clone(),
        });

        Ok(ThrowOutcome::Detonated(result))
    }

    /// Moves a unit. Returns false for disallowed moves (no action
    /// points, blocked tile, out of reach); a successful move runs the
    /// detection and reaction sweeps.
    pub fn move_unit(&mut self, unit_id: UnitId, destination: Position) -> Result<bool, SessionError> {
        self.ensure_in_progress()?;

        let (from, faction, mobility, concealed) = {
            let Some(unit) = self.state.unit(unit_id) else {
                return Err(SessionError::UnknownUnit(unit_id));
            };
            if !unit.can_act() {
                return Ok(false);
            }
            (
                unit.position,
                unit.faction,
                unit.stats.mobility,
                unit.concealed,
            )
        };

        if from.manhattan_distance(&destination) > mobility
            || !self.field.is_valid_position(destination)
            || self.field.unit_at(destination).is_some()
            || self.state.active_unit_at(destination).is_some()
        {
            return Ok(false);
        }

        let move_cost = self.tables.move_cost();
        {
            let unit = self
                .state
                .unit_mut(unit_id)
                .ok_or(SessionError::UnknownUnit(unit_id))?;
            match move_cost {
                ApCost::AllRemaining => {
                    unit.action_points.spend_all();
                }
                ApCost::Fixed(centipoints) => {
                    unit.spend_action_points(tactics_core::ActionPoints::new(centipoints));
                }
            }
            unit.position = destination;
        }

        tracing::debug!(unit = %unit_id, ?from, to = ?destination, "unit moved");
        self.events.push(CombatEvent::UnitMoved {
            unit: unit_id,
            from,
            to: destination,
        });

        // Detection: stepping into hostile view breaks concealment.
        if concealed {
            let spotted = self.state.active_units().any(|enemy| {
                enemy.faction.is_hostile_to(&faction)
                    && self.field.is_position_visible(
                        enemy.position,
                        destination,
                        enemy.stats.view_range,
                    )
            });
            if spotted {
                if let Some(unit) = self.state.unit_mut(unit_id) {
                    unit.break_concealment();
                }
                self.events.push(CombatEvent::ConcealmentBroken { unit: unit_id });
            }
        }

        // Extraction zone check for the player's side.
        if faction.is_player_controlled()
            && let Some(zone) = self.state.mission.extraction_zone
            && zone.contains(destination)
        {
            if let Some(unit) = self.state.unit_mut(unit_id) {
                unit.extracted = true;
            }
            self.events.push(CombatEvent::UnitExtracted { unit: unit_id });
        }

        // Reaction sweep: overwatch and bladestorm fire on the completed
        // move, in stable watcher order.
        let env = make_env(
            self.field.as_ref(),
            self.tables.as_ref(),
            self.catalog.as_ref(),
            self.rng.as_ref(),
        );
        let shots = on_unit_moved(&mut self.state, unit_id, from, destination, &env)?;
        for shot in shots {
            self.events.push(CombatEvent::ReactionTriggered {
                watcher: shot.watcher,
                target: unit_id,
                kind: shot.kind,
                result: shot.result,
            });
        }
        self.note_if_killed(unit_id);

        Ok(true)
    }

    /// Puts a unit on overwatch (costs its remaining action points).
    pub fn overwatch(&mut self, unit: UnitId) -> bool {
        enter_overwatch(&mut self.state, unit)
    }

    /// Reloads the unit's weapon.
    pub fn reload(&mut self, unit_id: UnitId) -> bool {
        let reload_cost = self.tables.reload_cost();
        let Some(unit) = self.state.unit_mut(unit_id) else {
            return false;
        };
        if !unit.can_act() || unit.weapon.is_none() {
            return false;
        }
        match reload_cost {
            ApCost::AllRemaining => {
                unit.action_points.spend_all();
            }
            ApCost::Fixed(centipoints) => {
                unit.spend_action_points(tactics_core::ActionPoints::new(centipoints));
            }
        }
        self.state.reload_weapon(unit_id)
    }

    /// Field-medic intervention: pins a downed unit at one health and
    /// protects it from bleeding out.
    pub fn stabilize(&mut self, unit_id: UnitId) -> bool {
        let Some(unit) = self.state.unit_mut(unit_id) else {
            return false;
        };
        unit.stabilize();
        true
    }

    // ========================================================================
    // Phase scheduling
    // ========================================================================

    /// Advances the phase machine by one phase. Entering the enemy phase
    /// runs every AI-controlled unit's decide/execute round before
    /// returning.
    pub fn end_phase(&mut self) -> Result<Phase, SessionError> {
        self.ensure_in_progress()?;

        let outcome = {
            let env = make_env(
                self.field.as_ref(),
                self.tables.as_ref(),
                self.catalog.as_ref(),
                self.rng.as_ref(),
            );
            CombatEngine::new(&mut self.state, &self.config).advance(&env)?
        };

        tracing::debug!(phase = %outcome.phase, turn = self.state.turn.turn, "phase advanced");
        self.events.push(CombatEvent::PhaseChanged {
            phase: outcome.phase,
            turn: self.state.turn.turn,
        });

        if let Some(report) = outcome.environment {
            for tick in report.ticks {
                self.events.push(CombatEvent::StatusTicked {
                    unit: tick.unit,
                    damage: tick.damage,
                    died: tick.died,
                });
                if tick.died {
                    self.events.push(CombatEvent::UnitKilled { unit: tick.unit });
                }
            }
            for detonation in report.detonations {
                for hit in &detonation.hits {
                    self.note_if_killed(hit.unit);
                }
                self.events
                    .push(CombatEvent::ExplosiveDetonated { result: detonation });
            }
        }

        if outcome.phase == Phase::EnemyPhase {
            self.run_enemy_phase();
        }

        if self.state.mission.status.is_terminal() {
            tracing::info!(status = ?self.state.mission.status, "mission ended");
            self.events.push(CombatEvent::MissionEnded {
                status: self.state.mission.status,
            });
        }

        Ok(self.state.turn.phase)
    }

    /// Runs phases until the next soldier phase begins or the mission
    /// ends. This is the "end turn" button.
    pub fn advance_turn(&mut self) -> Result<Phase, SessionError> {
        loop {
            let phase = self.end_phase()?;
            if phase == Phase::SoldierPhase || self.state.mission.status.is_terminal() {
                return Ok(phase);
            }
        }
    }

    /// Every living AI-controlled unit gets one decide/execute round.
    /// AI failures are contained: an error or panic forfeits that unit's
    /// action and the phase continues.
    fn run_enemy_phase(&mut self) {
        let Some(mut ai) = self.ai.take() else {
            tracing::debug!("enemy phase with no AI wired; enemies hold");
            return;
        };

        for unit in self.state.enemy_roster() {
            if self.state.mission.status.is_terminal() {
                break;
            }
            if !self.state.unit(unit).is_some_and(|u| u.can_act()) {
                continue;
            }

            ai.decide(&self.state, unit);
            let outcome = catch_unwind(AssertUnwindSafe(|| ai.execute(self, unit)));
            match outcome {
                Ok(Ok(acted)) => {
                    tracing::debug!(%unit, acted, "enemy unit finished");
                }
                Ok(Err(error)) => {
                    tracing::warn!(%unit, %error, "enemy AI failed; unit forfeits its turn");
                    self.events.push(CombatEvent::AiFaulted {
                        unit,
                        reason: error.to_string(),
                    });
                }
                Err(panic) => {
                    let reason = panic_message(&panic);
                    tracing::warn!(%unit, reason, "enemy AI panicked; unit forfeits its turn");
                    self.events.push(CombatEvent::AiFaulted {
                        unit,
                        reason: reason.to_owned(),
                    });
                }
            }
        }

        self.ai = Some(ai);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// This turn's initiative order.
    pub fn turn_order(&self) -> &[UnitId] {
        &self.state.turn.order
    }

    /// True when no living soldier has action points left; hosts use
    /// this to end the soldier phase automatically.
    pub fn soldiers_spent(&self) -> bool {
        self.state.soldiers_spent()
    }

    pub fn mission_status(&self) -> MissionStatus {
        self.state.mission.status
    }

    pub fn phase(&self) -> Phase {
        self.state.turn.phase
    }

    pub fn turn(&self) -> u32 {
        self.state.turn.turn
    }

    /// Read-only snapshot of the combat state. Hosts observing from other
    /// threads should clone this outside the session's critical section.
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn events(&self) -> &[CombatEvent] {
        self.events.events()
    }

    /// The event log as JSON, for host tooling.
    pub fn events_json(&self) -> serde_json::Result<String> {
        self.events.to_json()
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        if self.state.mission.status.is_terminal() {
            return Err(SessionError::MissionOver(self.state.mission.status));
        }
        Ok(())
    }

    fn note_if_killed(&mut self, unit: UnitId) {
        if self.state.unit(unit).is_some_and(|u| !u.is_alive()) {
            self.events.push(CombatEvent::UnitKilled { unit });
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Builder for [`CombatSession`] with stock-content defaults.
pub struct CombatSessionBuilder {
    seed: u64,
    config: CombatConfig,
    mission: MissionState,
    field: Option<Box<dyn FieldOracle>>,
    tables: Option<Box<dyn TablesOracle>>,
    catalog: Option<Box<dyn CatalogOracle>>,
    rng: Option<Box<dyn RngOracle>>,
    ai: Option<Box<dyn EnemyAi>>,
}

impl CombatSessionBuilder {
    fn new() -> Self {
        Self {
            seed: 0,
            config: CombatConfig::default(),
            mission: MissionState::default(),
            field: None,
            tables: None,
            catalog: None,
            rng: None,
            ai: None,
        }
    }

    /// Session seed; a fixed seed replays the whole battle.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mission(mut self, mission: MissionState) -> Self {
        self.mission = mission;
        self
    }

    pub fn field(mut self, field: impl FieldOracle + 'static) -> Self {
        self.field = Some(Box::new(field));
        self
    }

    pub fn tables(mut self, tables: impl TablesOracle + 'static) -> Self {
        self.tables = Some(Box::new(tables));
        self
    }

    pub fn catalog(mut self, catalog: impl CatalogOracle + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    pub fn rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    pub fn ai(mut self, ai: impl EnemyAi + 'static) -> Self {
        self.ai = Some(Box::new(ai));
        self
    }

    pub fn build(self) -> CombatSession {
        let state = CombatState::new(self.seed).with_mission(self.mission);
        CombatSession {
            state,
            config: self.config,
            field: self.field.unwrap_or_else(|| Box::new(OpenField::new(64, 64))),
            tables: self
                .tables
                .unwrap_or_else(|| Box::new(BalanceTables::default())),
            catalog: self.catalog.unwrap_or_else(|| Box::new(Catalog::stock())),
            rng: self.rng.unwrap_or_else(|| Box::new(PcgRng)),
            ai: self.ai,
            events: EventLog::new(),
            weapon_handles: HashMap::new(),
            explosive_handles: HashMap::new(),
        }
    }
}
