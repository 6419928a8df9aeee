//! Reactive trigger registry: overwatch and bladestorm.
//!
//! Watchers fire out of normal turn order when an enemy move trips them.
//! The sweep evaluates candidates in ascending unit id so simultaneous
//! triggers resolve in a stable, testable order.

use crate::combat::resolve::resolve_attack_with_profile;
use crate::combat::{AttackContext, CombatError, CombatResult, ShotKind, resolve_attack};
use crate::env::{ApCost, CombatEnv, compute_seed};
use crate::state::{CombatState, Position, ReactionState, UnitId};

/// Roll context for overwatch trigger draws.
const ROLL_OVERWATCH: u32 = 16;

/// One reaction shot fired during a sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionShot {
    pub watcher: UnitId,
    pub kind: ShotKind,
    pub result: CombatResult,
}

/// Puts a unit on overwatch: costs all remaining action points and arms a
/// single reaction shot. Returns false if the unit cannot act.
pub fn enter_overwatch(state: &mut CombatState, unit_id: UnitId) -> bool {
    let Some(unit) = state.unit_mut(unit_id) else {
        return false;
    };
    if !unit.can_act() {
        return false;
    }
    unit.action_points.spend_all();
    unit.reaction = ReactionState::Watching;
    true
}

/// Arms bladestorm on a unit that has the ability. Unlike overwatch this
/// state persists across turns until the ability is unequipped.
pub fn arm_bladestorm(state: &mut CombatState, unit_id: UnitId) -> bool {
    let Some(unit) = state.unit_mut(unit_id) else {
        return false;
    };
    if !unit.has_ability(crate::state::AbilityFlags::BLADESTORM) {
        return false;
    }
    unit.reaction = ReactionState::BladestormArmed;
    true
}

/// Clears expired overwatch states for one faction's turn start.
///
/// A watch that survived the opposing turn without firing is spent;
/// bladestorm is untouched.
pub fn clear_overwatch_for_side(state: &mut CombatState, player_controlled: bool) {
    for unit in state.units_mut() {
        if unit.faction.is_player_controlled() == player_controlled
            && unit.reaction == ReactionState::Watching
        {
            unit.reaction = ReactionState::Idle;
        }
    }
}

/// Reaction sweep after a completed move.
///
/// Evaluated once per move action (from its start tile to its end tile),
/// not per traversed tile. Two trigger families run in ascending watcher
/// id order:
///
/// - **Overwatch**: hostile watchers that can see the mover's destination
///   roll their trigger chance; a successful roll consumes the watch state
///   and fires one overwatch shot through the pipeline.
/// - **Bladestorm**: hostile armed blademasters the mover ends up newly
///   adjacent to strike once, with no action-point cost.
pub fn on_unit_moved(
    state: &mut CombatState,
    mover_id: UnitId,
    from: Position,
    to: Position,
    env: &CombatEnv<'_>,
) -> Result<Vec<ReactionShot>, CombatError> {
    let rng = env.rng()?;
    let field = env.field()?;
    let tables = env.tables()?;

    let mover_faction = match state.unit(mover_id) {
        Some(mover) => mover.faction,
        None => return Err(CombatError::UnknownUnit(mover_id)),
    };

    // Candidates snapshot: the shots themselves mutate state, so decide
    // who reacts before anything fires. Arena order is ascending id.
    struct Candidate {
        watcher: UnitId,
        kind: ShotKind,
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    for unit in state.active_units() {
        if unit.id == mover_id || !unit.faction.is_hostile_to(&mover_faction) {
            continue;
        }
        match unit.reaction {
            ReactionState::Watching => {
                if field.is_position_visible(unit.position, to, unit.stats.view_range) {
                    candidates.push(Candidate {
                        watcher: unit.id,
                        kind: ShotKind::Overwatch,
                    });
                }
            }
            ReactionState::BladestormArmed => {
                let newly_adjacent =
                    unit.position.is_adjacent_to(&to) && !unit.position.is_adjacent_to(&from);
                if newly_adjacent {
                    candidates.push(Candidate {
                        watcher: unit.id,
                        kind: ShotKind::Melee,
                    });
                }
            }
            ReactionState::Idle => {}
        }
    }

    let session_seed = state.session_seed;
    let mut shots = Vec::new();

    for candidate in candidates {
        // The mover may already be dead from an earlier reaction.
        if !state.unit(mover_id).is_some_and(|u| u.is_active()) {
            break;
        }

        match candidate.kind {
            ShotKind::Overwatch => {
                let chance = state
                    .unit(candidate.watcher)
                    .map_or(0, |u| i32::from(u.stats.overwatch_chance));
                let seed = compute_seed(
                    session_seed,
                    state.turn.next_nonce(),
                    candidate.watcher.0,
                    ROLL_OVERWATCH,
                );
                if !rng.chance(seed, chance) {
                    continue;
                }

                // Single shot per trigger: the watch state is consumed by
                // firing, hit or miss.
                if let Some(watcher) = state.unit_mut(candidate.watcher) {
                    watcher.reaction = ReactionState::Idle;
                }

                let ctx = AttackContext::derive(state, candidate.watcher, mover_id, env)?;
                let result =
                    resolve_attack(state, candidate.watcher, mover_id, ShotKind::Overwatch, &ctx, env)?;
                shots.push(ReactionShot {
                    watcher: candidate.watcher,
                    kind: ShotKind::Overwatch,
                    result,
                });
            }
            _ => {
                // Bladestorm: melee profile without the action-point gate.
                let mut profile = tables.shot_profile(ShotKind::Melee);
                profile.requires_action_points = false;
                profile.ap_cost = ApCost::Fixed(0);

                let ctx = AttackContext::derive(state, candidate.watcher, mover_id, env)?;
                let result = resolve_attack_with_profile(
                    state,
                    candidate.watcher,
                    mover_id,
                    ShotKind::Melee,
                    profile,
                    &ctx,
                    env,
                )?;
                shots.push(ReactionShot {
                    watcher: candidate.watcher,
                    kind: ShotKind::Melee,
                    result,
                });
            }
        }
    }

    Ok(shots)
}
