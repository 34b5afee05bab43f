//! Construction of the ghost roster from board geometry.

use glam::IVec2;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::entity::ghost::{Ghost, GhostType};
use crate::map::board::Board;

/// Builds ghosts at canonical positions derived from the board's size.
pub struct GhostFactory;

impl GhostFactory {
    /// The canonical spawn cell for a ghost type, around the centre of the board.
    ///
    /// When the canonical cell is a wall, the nearest open cell is used instead.
    pub fn spawn_position(ghost_type: GhostType, board: &Board) -> IVec2 {
        let center = IVec2::new(board.width() / 2, board.height() / 2);
        let canonical = center
            + match ghost_type {
                GhostType::Blinky => IVec2::new(0, -2),
                GhostType::Pinky => IVec2::new(-1, 0),
                GhostType::Inky => IVec2::ZERO,
                GhostType::Clyde => IVec2::new(1, 0),
            };

        if !board.is_wall(canonical) {
            return canonical;
        }
        let resolved = board.nearest_open(canonical).unwrap_or(canonical);
        debug!(ghost = %ghost_type, ?canonical, ?resolved, "Canonical ghost spawn is a wall");
        resolved
    }

    /// The scatter target for a ghost type: one per corner, on or just inside the outer wall.
    pub fn home_corner(ghost_type: GhostType, board: &Board) -> IVec2 {
        let (width, height) = (board.width(), board.height());
        match ghost_type {
            GhostType::Blinky => IVec2::new(width - 2, 0),
            GhostType::Pinky => IVec2::new(0, 0),
            GhostType::Inky => IVec2::new(width - 2, height - 1),
            GhostType::Clyde => IVec2::new(0, height - 1),
        }
    }

    pub fn create(ghost_type: GhostType, board: &Board, speed: f32) -> Ghost {
        Ghost::new(
            ghost_type,
            Self::spawn_position(ghost_type, board),
            Self::home_corner(ghost_type, board),
            speed,
        )
    }

    /// All four ghosts, Blinky first.
    pub fn create_all(board: &Board, speed: f32) -> SmallVec<[Ghost; 4]> {
        GhostType::iter().map(|ghost_type| Self::create(ghost_type, board, speed)).collect()
    }

    /// Pac-Man starts near the bottom-centre of the board.
    pub fn pacman_spawn(board: &Board) -> IVec2 {
        let canonical = IVec2::new(board.width() / 2, board.height() - 3);
        if !board.is_wall(canonical) {
            return canonical;
        }
        board.nearest_open(canonical).unwrap_or(canonical)
    }
}
