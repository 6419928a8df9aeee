//! Status effect ledger for units.
//!
//! Status effects are timed conditions that either bleed health every
//! environment phase (damage-over-time kinds) or gate behavior (a stunned
//! unit cannot act, a marked target is easier to hit).
//!
//! # Turn-based Duration
//!
//! Effects store a remaining duration in turns. The ledger is ticked once
//! per unit per environment phase; each tick decrements every duration by
//! exactly one and purges effects that reach zero.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Per-kind behavior, looked up from a table instead of matched inline.
///
/// Adding an effect kind means adding one table row; the resolution and
/// scheduling code never grows another match arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectProfile {
    /// Effect applies its intensity as damage on every ledger tick.
    pub deals_tick_damage: bool,
    /// Effect prevents the unit from taking any action while active.
    pub blocks_action: bool,
}

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Bleeding,
    Burning,
    Poisoned,
    Acid,
    Radiation,
    Frostbite,
    Corrosion,
    Electrocuted,

    // ========================================================================
    // Behavioral
    // ========================================================================
    /// Cannot act at all.
    Stunned,

    /// Under covering fire; aim penalty scales with the unit's suppression
    /// counter.
    Suppressed,

    /// Painted for the squad; attacks against this unit gain aim.
    Marked,

    /// Lost nerve; cannot act this turn.
    Panicked,

    /// Under mind control; acts for the opposing side.
    Dominated,

    /// Aim penalty from a flashbang or concussion.
    Disoriented,
}

impl StatusEffectKind {
    const PROFILES: &'static [(StatusEffectKind, EffectProfile)] = &[
        (Self::Bleeding, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Burning, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Poisoned, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Acid, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Radiation, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Frostbite, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Corrosion, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Electrocuted, EffectProfile { deals_tick_damage: true, blocks_action: false }),
        (Self::Stunned, EffectProfile { deals_tick_damage: false, blocks_action: true }),
        (Self::Suppressed, EffectProfile { deals_tick_damage: false, blocks_action: false }),
        (Self::Marked, EffectProfile { deals_tick_damage: false, blocks_action: false }),
        (Self::Panicked, EffectProfile { deals_tick_damage: false, blocks_action: true }),
        (Self::Dominated, EffectProfile { deals_tick_damage: false, blocks_action: false }),
        (Self::Disoriented, EffectProfile { deals_tick_damage: false, blocks_action: false }),
    ];

    /// Behavior table lookup.
    pub fn profile(self) -> EffectProfile {
        Self::PROFILES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, profile)| *profile)
            .expect("every status effect kind has a profile row")
    }

    /// True for kinds that bleed health each environment phase.
    #[inline]
    pub fn deals_tick_damage(self) -> bool {
        self.profile().deals_tick_damage
    }
}

/// A single status effect instance on a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Remaining duration in turns. Always > 0 while the effect is in the
    /// ledger.
    pub duration: u8,
    /// Magnitude: damage per tick for damage-over-time kinds, modifier
    /// scale for behavioral kinds.
    pub intensity: u16,
}

/// Outcome of one ledger tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Total damage-over-time to apply to the owner.
    pub damage: u32,
    /// Number of effects that expired this tick.
    pub expired: usize,
}

/// Active status effects on a unit.
///
/// Same-kind stacking merges: re-adding a kind refreshes duration and
/// intensity each to the stronger value rather than duplicating the entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusLedger {
    /// Creates an empty ledger.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks whether an effect of the given kind is active.
    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Returns the active effect of the given kind, if any.
    pub fn get(&self, kind: StatusEffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Adds a status effect.
    ///
    /// A duration of zero is ignored. If the kind is already present the
    /// entry is merged: duration and intensity each keep the stronger
    /// value. A full ledger drops the new effect.
    pub fn add(&mut self, kind: StatusEffectKind, duration: u8, intensity: u16) {
        if duration == 0 {
            return;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.duration = existing.duration.max(duration);
            existing.intensity = existing.intensity.max(intensity);
            return;
        }

        if !self.effects.is_full() {
            self.effects.push(StatusEffect {
                kind,
                duration,
                intensity,
            });
        }
    }

    /// Removes an effect immediately.
    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Removes every effect.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Ticks the ledger once: sums damage-over-time intensities, decrements
    /// every duration by exactly one, and purges effects that reach zero.
    ///
    /// The returned damage has not yet been applied to the owner; the
    /// environment phase routes it through `UnitState::take_damage` so that
    /// stabilization pinning applies.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for effect in &mut self.effects {
            debug_assert!(effect.duration > 0, "expired effect left in ledger");
            if effect.kind.deals_tick_damage() {
                outcome.damage += u32::from(effect.intensity);
            }
            effect.duration -= 1;
        }

        let before = self.effects.len();
        self.effects.retain(|e| e.duration > 0);
        outcome.expired = before - self.effects.len();
        outcome
    }

    /// True if any active effect prevents the owner from acting.
    pub fn blocks_action(&self) -> bool {
        self.effects.iter().any(|e| e.kind.profile().blocks_action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_by_one_and_purges_at_zero() {
        let mut ledger = StatusLedger::empty();
        ledger.add(StatusEffectKind::Poisoned, 2, 5);

        let first = ledger.tick();
        assert_eq!(first.damage, 5);
        assert_eq!(first.expired, 0);
        assert_eq!(ledger.get(StatusEffectKind::Poisoned).unwrap().duration, 1);

        let second = ledger.tick();
        assert_eq!(second.damage, 5);
        assert_eq!(second.expired, 1);
        assert!(!ledger.has(StatusEffectKind::Poisoned));
    }

    #[test]
    fn behavioral_effects_deal_no_tick_damage() {
        let mut ledger = StatusLedger::empty();
        ledger.add(StatusEffectKind::Stunned, 1, 3);
        ledger.add(StatusEffectKind::Marked, 2, 20);

        let outcome = ledger.tick();
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.expired, 1);
        assert!(ledger.has(StatusEffectKind::Marked));
    }

    #[test]
    fn same_kind_merges_to_stronger_values() {
        let mut ledger = StatusLedger::empty();
        ledger.add(StatusEffectKind::Burning, 3, 2);
        ledger.add(StatusEffectKind::Burning, 1, 6);

        assert_eq!(ledger.len(), 1);
        let effect = ledger.get(StatusEffectKind::Burning).unwrap();
        assert_eq!(effect.duration, 3);
        assert_eq!(effect.intensity, 6);
    }

    #[test]
    fn zero_duration_add_is_ignored() {
        let mut ledger = StatusLedger::empty();
        ledger.add(StatusEffectKind::Bleeding, 0, 4);
        assert!(ledger.is_empty());
    }

    #[test]
    fn stunned_blocks_action() {
        let mut ledger = StatusLedger::empty();
        assert!(!ledger.blocks_action());
        ledger.add(StatusEffectKind::Stunned, 1, 0);
        assert!(ledger.blocks_action());
    }

    #[test]
    fn multiple_dot_kinds_accumulate() {
        let mut ledger = StatusLedger::empty();
        ledger.add(StatusEffectKind::Poisoned, 2, 5);
        ledger.add(StatusEffectKind::Burning, 2, 3);

        assert_eq!(ledger.tick().damage, 8);
    }
}
