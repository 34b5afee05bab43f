//! Owned per-frame views of the game state for renderers.

use std::time::Duration;

use glam::IVec2;
use serde::Serialize;

use crate::entity::ghost::{Ghost, GhostMode, GhostType};
use crate::entity::pacman::Pacman;
use crate::entity::Entity;
use crate::events::Statistics;
use crate::game::GameStage;
use crate::map::{board::Board, direction::Direction, layout::CellKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacmanSnapshot {
    pub position: IVec2,
    pub score: u32,
    pub lives: u8,
    pub powered_up: bool,
    pub power_time_remaining: Duration,
    pub direction: Option<Direction>,
}

impl From<&Pacman> for PacmanSnapshot {
    fn from(pacman: &Pacman) -> Self {
        Self {
            position: pacman.position(),
            score: pacman.score(),
            lives: pacman.lives(),
            powered_up: pacman.is_powered_up(),
            power_time_remaining: pacman.power_time_remaining(),
            direction: pacman.direction(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GhostSnapshot {
    pub position: IVec2,
    pub ghost_type: GhostType,
    pub mode: GhostMode,
    pub vulnerable: bool,
    pub direction: Option<Direction>,
}

impl From<&Ghost> for GhostSnapshot {
    fn from(ghost: &Ghost) -> Self {
        Self {
            position: ghost.position(),
            ghost_type: ghost.ghost_type(),
            mode: ghost.mode(),
            vulnerable: ghost.is_vulnerable(),
            direction: ghost.direction(),
        }
    }
}

/// Everything a renderer needs for one frame. Owned, so it can outlive the tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// The live grid, one row per entry.
    pub board: Vec<Vec<CellKind>>,
    pub pellets_eaten: u32,
    pub total_pellets: u32,
    pub pacman: PacmanSnapshot,
    pub ghosts: Vec<GhostSnapshot>,
    pub level: u32,
    pub stage: GameStage,
    pub paused: bool,
    pub high_score: u32,
    pub statistics: Statistics,
    pub bonus_fruit: Option<IVec2>,
    /// The mode the scatter/chase timer indicates.
    pub alternation: GhostMode,
    pub bonus_fruit_spawn_chance: f32,
}

impl GameSnapshot {
    pub fn grid(board: &Board) -> Vec<Vec<CellKind>> {
        board.rows().map(<[CellKind]>::to_vec).collect()
    }

    pub fn playable(&self) -> bool {
        self.stage == GameStage::Playing
    }

    /// The ghost of the given type, if it is on the board.
    pub fn ghost(&self, ghost_type: GhostType) -> Option<&GhostSnapshot> {
        self.ghosts.iter().find(|ghost| ghost.ghost_type == ghost_type)
    }
}
