//! Tactical field oracle: line of sight, cover, and movement queries.
//!
//! The core never walks the map itself. Pathfinding, visibility tracing,
//! and cover layout belong to the host's field implementation; resolution
//! only asks the questions below.

use crate::state::{Position, UnitId};

/// Cover at a target's tile, from nothing to a solid wall.
///
/// Each stronger tier subtracts a larger aim penalty; the exact numbers
/// come from `TablesOracle::cover_penalty`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CoverKind {
    #[default]
    None,
    Low,
    Half,
    Full,
    Deep,
}

/// Line-of-sight, cover, and occupancy queries delegated to the host.
///
/// Implementations must be deterministic: the resolution pipeline bakes
/// these answers into its hit math, and a replayed session asks the same
/// questions in the same order.
pub trait FieldOracle: Send + Sync {
    /// True if the position exists and is standable.
    fn is_valid_position(&self, position: Position) -> bool;

    /// The unit occupying `position`, if the field tracks one there.
    fn unit_at(&self, position: Position) -> Option<UnitId>;

    /// Whether `to` is visible from `from` within `view_range` tiles.
    fn is_position_visible(&self, from: Position, to: Position, view_range: u32) -> bool;

    /// Cover tier at a tile.
    fn cover_at(&self, position: Position) -> CoverKind;

    /// Whether the target's cover blocks fire from this attack angle.
    /// Returning false means the attacker is flanking.
    fn cover_blocks(&self, attacker: Position, target: Position) -> bool {
        let _ = (attacker, target);
        true
    }

    /// Units within `radius` tiles of `center` (euclidean), in no
    /// particular order.
    fn units_in_range(&self, center: Position, radius: u32) -> Vec<UnitId>;

    /// Whether a unit may end its move on `position`.
    fn can_occupy(&self, position: Position) -> bool {
        self.is_valid_position(position) && self.unit_at(position).is_none()
    }
}

/// Featureless open ground with no occlusion and no cover.
///
/// Useful as a test double and for tools that only need distances.
#[derive(Clone, Copy, Debug)]
pub struct OpenField {
    pub width: i32,
    pub height: i32,
}

impl OpenField {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl FieldOracle for OpenField {
    fn is_valid_position(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    fn unit_at(&self, _position: Position) -> Option<UnitId> {
        None
    }

    fn is_position_visible(&self, from: Position, to: Position, view_range: u32) -> bool {
        from.euclidean_distance(&to) <= view_range
    }

    fn cover_at(&self, _position: Position) -> CoverKind {
        CoverKind::None
    }

    fn units_in_range(&self, _center: Position, _radius: u32) -> Vec<UnitId> {
        Vec::new()
    }
}
