use glam::{IVec2, Vec2};
use strum_macros::{AsRefStr, EnumIter};

/// The four cardinal directions.
///
/// Variants are declared in decision priority order: when two candidate moves score the same,
/// the one listed first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Left,
    Down,
    Right,
}

impl Direction {
    /// The four cardinal directions, in tie-break priority order (up, left, down, right).
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the tile offset of one step in this direction. Y grows downward.
    pub const fn as_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Returns the direction as a usize (0-3), in priority order.
    pub const fn as_usize(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down => 2,
            Direction::Right => 3,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when `other` points exactly the other way.
    pub fn is_opposite_of(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Offset for an optional heading; no heading yields a zero vector.
pub fn heading_vector(direction: Option<Direction>) -> IVec2 {
    direction.map_or(IVec2::ZERO, Direction::as_ivec2)
}
