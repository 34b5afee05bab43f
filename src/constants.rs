//! This module contains all the constants used by the simulation.

use std::time::Duration;

/// Nominal cadence the host is expected to drive `tick` at.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Lives Pac-Man starts a session with.
pub const STARTING_LIVES: u8 = 3;

/// Highest level; the level counter saturates here.
pub const MAX_LEVEL: u32 = 10;

pub mod score {
    /// Points for a regular pellet.
    pub const PELLET: u32 = 10;
    /// Points for a power pellet.
    pub const POWER_PELLET: u32 = 50;
    /// Points for the first ghost of a power-up window; doubled for each further ghost.
    pub const GHOST_BASE: u32 = 200;
    /// Points for a bonus fruit on level 1.
    pub const FRUIT_BASE: u32 = 100;
    /// Additional fruit points per level after the first.
    pub const FRUIT_PER_LEVEL: u32 = 50;
    /// A life is awarded every time the score crosses a multiple of this.
    pub const EXTRA_LIFE_INTERVAL: u32 = 10_000;
}

pub mod speed {
    /// Pac-Man moves one cell per tick.
    pub const PACMAN: f32 = 1.0;
    /// Ghost speed on level 1.
    pub const GHOST_BASE: f32 = 0.8;
    /// Ghost speed gained per level.
    pub const GHOST_PER_LEVEL: f32 = 0.05;
    /// Frightened ghosts move at this fraction of their normal speed.
    pub const FRIGHTENED_FACTOR: f32 = 0.5;
    /// Eaten ghosts travel home at this speed regardless of level.
    pub const EATEN: f32 = 1.5;
}

pub mod timing {
    use std::time::Duration;

    /// Scatter phase length on level 1.
    pub const SCATTER: Duration = Duration::from_millis(7_000);
    /// Scatter shortens by this much per level.
    pub const SCATTER_PER_LEVEL: Duration = Duration::from_millis(200);
    /// Chase phase length on level 1.
    pub const CHASE: Duration = Duration::from_millis(20_000);
    /// Chase shortens by this much per level.
    pub const CHASE_PER_LEVEL: Duration = Duration::from_millis(1_000);
    /// Power-up length on level 1.
    pub const POWER_UP: Duration = Duration::from_millis(10_000);
    /// Power-up shortens by this much per level.
    pub const POWER_UP_PER_LEVEL: Duration = Duration::from_millis(300);
    /// Window after a death during which ghost collisions are ignored.
    pub const COLLISION_COOLDOWN: Duration = Duration::from_millis(1_000);
    /// Delay between clearing a maze and loading the next one.
    pub const LEVEL_ADVANCE_DELAY: Duration = Duration::from_millis(2_000);
    /// How long an uncollected bonus fruit stays on the board.
    pub const BONUS_FRUIT: Duration = Duration::from_millis(10_000);
}

pub mod fruit {
    /// Pellet counts at which a bonus fruit appears.
    pub const THRESHOLDS: [u32; 2] = [50, 100];
    /// Spawn chance reported for level 1.
    pub const SPAWN_CHANCE_BASE: f32 = 0.1;
    /// Spawn chance gained per level.
    pub const SPAWN_CHANCE_PER_LEVEL: f32 = 0.02;
}

pub mod ghost {
    /// Clyde gives up the chase inside this many tiles of Pac-Man.
    pub const SHY_DISTANCE: i32 = 8;
    /// Pinky aims this many tiles ahead of Pac-Man.
    pub const AMBUSH_LOOKAHEAD: i32 = 4;
    /// Inky pivots on the tile this many tiles ahead of Pac-Man.
    pub const PINCER_LOOKAHEAD: i32 = 2;
}

/// Width of the built-in layouts, in cells.
pub const LAYOUT_WIDTH: usize = 15;
/// Height of the built-in layouts, in cells.
pub const LAYOUT_HEIGHT: usize = 11;

/// A built-in layout as a matrix of cell codes:
/// 0 empty, 1 wall, 2 pellet, 3 power pellet, 4 ghost house, 5 bonus fruit.
pub type RawLayout = [[u8; LAYOUT_WIDTH]; LAYOUT_HEIGHT];

/// The rotation of built-in layouts; level `n` uses entry `(n - 1) % 3`.
pub const RAW_LAYOUTS: [RawLayout; 3] = [
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
        [1, 3, 1, 1, 2, 1, 2, 1, 2, 1, 2, 1, 1, 3, 1],
        [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        [1, 2, 1, 1, 2, 1, 1, 4, 1, 1, 2, 1, 1, 2, 1],
        [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        [1, 2, 1, 1, 1, 1, 2, 1, 2, 1, 1, 1, 1, 2, 1],
        [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        [1, 3, 1, 1, 2, 1, 2, 1, 2, 1, 2, 1, 1, 3, 1],
        [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 3, 2, 2, 2, 2, 1, 0, 1, 2, 2, 2, 2, 3, 1],
        [1, 2, 1, 1, 1, 2, 1, 0, 1, 2, 1, 1, 1, 2, 1],
        [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        [1, 2, 1, 2, 1, 1, 1, 4, 1, 1, 1, 2, 1, 2, 1],
        [1, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 1],
        [1, 2, 1, 2, 1, 1, 1, 4, 1, 1, 1, 2, 1, 2, 1],
        [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1],
        [1, 2, 1, 1, 1, 2, 1, 0, 1, 2, 1, 1, 1, 2, 1],
        [1, 3, 2, 2, 2, 2, 1, 0, 1, 2, 2, 2, 2, 3, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
    [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1],
        [1, 3, 1, 2, 1, 2, 1, 1, 1, 2, 1, 2, 1, 3, 1],
        [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
        [1, 1, 1, 2, 1, 1, 2, 4, 2, 1, 1, 2, 1, 1, 1],
        [0, 0, 0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 0, 0, 0],
        [1, 1, 1, 2, 1, 1, 2, 4, 2, 1, 1, 2, 1, 1, 1],
        [1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1],
        [1, 3, 1, 2, 1, 2, 1, 1, 1, 2, 1, 2, 1, 3, 1],
        [1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 1, 2, 2, 2, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_raw_layout_boundaries() {
        for layout in RAW_LAYOUTS.iter() {
            assert!(layout[0].iter().all(|&c| c == 1));
            assert!(layout[LAYOUT_HEIGHT - 1].iter().all(|&c| c == 1));
        }
    }

    #[test]
    fn test_raw_layout_power_pellets() {
        for layout in RAW_LAYOUTS.iter() {
            let count = layout.iter().flatten().filter(|&&c| c == 3).count();
            assert_eq!(count, 4);
        }
    }

    #[test]
    fn test_ghost_score_doubling_reaches_1600() {
        assert_eq!(score::GHOST_BASE << 3, 1600);
    }
}
