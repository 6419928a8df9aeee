use std::fmt;

/// Unique identifier for a unit tracked in the combat state.
///
/// Ids index the unit arena directly and never change for the lifetime of a
/// session. Wherever simultaneous events need a stable order (reaction
/// sweeps, initiative ties), ascending `UnitId` is the tie-break.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position in tile coordinates, plus elevation level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    /// Elevation level (rooftops, walkways). One level of height advantage
    /// is worth a fixed aim bonus, see `TablesOracle::height_bonus_per_level`.
    pub height: i8,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0,
        y: 0,
        height: 0,
    };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, height: 0 }
    }

    pub const fn with_height(x: i32, y: i32, height: i8) -> Self {
        Self { x, y, height }
    }

    /// Manhattan distance over the ground plane.
    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance over the ground plane, rounded down to whole tiles.
    pub fn euclidean_distance(&self, other: &Position) -> u32 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        ((dx * dx + dy * dy) as f64).sqrt() as u32
    }

    /// Chessboard distance; 1 means the tiles touch (including diagonals).
    pub fn chebyshev_distance(&self, other: &Position) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// True if the tiles touch orthogonally or diagonally.
    pub fn is_adjacent_to(&self, other: &Position) -> bool {
        let d = self.chebyshev_distance(other);
        d == 1
    }

    /// Height difference of `self` over `other`, in levels.
    pub fn height_advantage_over(&self, other: &Position) -> i8 {
        self.height - other.height
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Action point meter in centipoints (100 = one full point).
///
/// Fixed-point storage keeps fractional costs (a pistol shot is half a
/// point) exactly representable while the type stays `Eq` and `Ord`, which
/// the deterministic scheduler relies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPoints(pub u16);

impl ActionPoints {
    pub const ZERO: Self = Self(0);
    /// One full action point.
    pub const ONE: Self = Self(100);

    pub const fn new(centipoints: u16) -> Self {
        Self(centipoints)
    }

    /// Constructs from whole points.
    pub const fn from_points(points: u16) -> Self {
        Self(points * 100)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Spends up to `cost`, saturating at zero. Returns the amount actually
    /// spent.
    pub fn spend(&mut self, cost: ActionPoints) -> ActionPoints {
        let spent = self.0.min(cost.0);
        self.0 -= spent;
        ActionPoints(spent)
    }

    /// Drains the meter entirely. Returns the amount spent.
    pub fn spend_all(&mut self) -> ActionPoints {
        let spent = self.0;
        self.0 = 0;
        ActionPoints(spent)
    }
}

impl fmt::Display for ActionPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Unit allegiance.
///
/// The phase machine treats `Soldier` as the player-controlled side; every
/// other faction acts during the enemy phase.
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
pub enum Faction {
    /// Player-controlled squad member.
    #[default]
    Soldier,
    /// Regular enemy forces.
    Alien,
    /// Elite boss-class enemy with its own reinforcement behavior.
    Ruler,
    /// Named nemesis enemy.
    Chosen,
}

impl Faction {
    /// True for the side that acts in the soldier phase.
    #[inline]
    pub const fn is_player_controlled(&self) -> bool {
        matches!(self, Faction::Soldier)
    }

    /// Soldier against everything else; enemy factions never fight each other.
    pub const fn is_hostile_to(&self, other: &Faction) -> bool {
        self.is_player_controlled() != other.is_player_controlled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_and_chebyshev_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -4);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(a.chebyshev_distance(&b), 4);
        assert_eq!(a.euclidean_distance(&b), 5);
    }

    #[test]
    fn adjacency_includes_diagonals() {
        let a = Position::new(2, 2);
        assert!(a.is_adjacent_to(&Position::new(3, 3)));
        assert!(a.is_adjacent_to(&Position::new(2, 1)));
        assert!(!a.is_adjacent_to(&Position::new(2, 2)));
        assert!(!a.is_adjacent_to(&Position::new(4, 2)));
    }

    #[test]
    fn action_points_spend_saturates() {
        let mut ap = ActionPoints::from_points(1);
        let spent = ap.spend(ActionPoints::new(150));
        assert_eq!(spent, ActionPoints::new(100));
        assert!(ap.is_empty());
    }

    #[test]
    fn faction_hostility_is_soldier_versus_rest() {
        assert!(Faction::Soldier.is_hostile_to(&Faction::Alien));
        assert!(Faction::Ruler.is_hostile_to(&Faction::Soldier));
        assert!(!Faction::Alien.is_hostile_to(&Faction::Chosen));
        assert!(!Faction::Soldier.is_hostile_to(&Faction::Soldier));
    }
}
