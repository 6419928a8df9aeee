//! Destructible environment objects.
//!
//! Cars, barrels, and cover pieces that soak stray fire. Objects carrying
//! an explosive payload detonate when destroyed or when a fuse runs out,
//! and may set off their neighbors.

use super::common::Position;
use super::equipment::ExplosiveHandle;

/// Identifier into the destructible arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestructibleId(pub u16);

impl DestructibleId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One destructible object on the field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestructibleState {
    pub id: DestructibleId,
    pub position: Position,
    pub health: u32,
    /// Explosive charge released when this object is destroyed.
    pub payload: Option<ExplosiveHandle>,
    /// Turns until the payload detonates on its own. Counted down every
    /// environment phase once set.
    pub fuse: Option<u8>,
}

impl DestructibleState {
    pub fn new(id: DestructibleId, position: Position, health: u32) -> Self {
        Self {
            id,
            position,
            health,
            payload: None,
            fuse: None,
        }
    }

    pub fn with_payload(mut self, payload: ExplosiveHandle) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }

    /// Applies damage; returns true if this hit destroyed the object.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        self.is_destroyed()
    }

    /// Lights the fuse if the object has a payload and is not already
    /// burning down.
    pub fn ignite(&mut self, turns: u8) {
        if self.payload.is_some() && self.fuse.is_none() {
            self.fuse = Some(turns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destruction_reports_once() {
        let mut barrel = DestructibleState::new(DestructibleId(0), Position::new(1, 1), 5);
        assert!(!barrel.take_damage(3));
        assert!(barrel.take_damage(9));
        assert!(!barrel.take_damage(1));
    }

    #[test]
    fn ignite_requires_payload() {
        let mut crate_ = DestructibleState::new(DestructibleId(0), Position::new(0, 0), 5);
        crate_.ignite(2);
        assert!(crate_.fuse.is_none());

        let mut barrel = DestructibleState::new(DestructibleId(1), Position::new(0, 1), 5)
            .with_payload(ExplosiveHandle(0));
        barrel.ignite(2);
        assert_eq!(barrel.fuse, Some(2));
    }
}
