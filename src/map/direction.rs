use glam::IVec2;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// The four cardinal directions.
///
/// The declaration order (Up, Down, Left, Right) is the fixed enumeration order used
/// everywhere a tie between directions has to be broken, most importantly by ghost targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four cardinal directions, in tie-breaking order.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit vector for this direction. Y grows downwards.
    pub fn as_ivec2(self) -> IVec2 {
        self.into()
    }

    /// Returns true for Left and Right.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Maps a unit step back to its direction, if it is one.
    pub fn from_step(step: IVec2) -> Option<Direction> {
        match (step.x, step.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Unit vector for an optional heading; a stationary entity has the zero vector.
pub fn heading_vector(direction: Option<Direction>) -> IVec2 {
    direction.map(IVec2::from).unwrap_or(IVec2::ZERO)
}
