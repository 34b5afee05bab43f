//! Level progression: the layout rotation, difficulty scaling and bonus fruit thresholds.

use std::time::Duration;

use serde::Serialize;
use smallvec::SmallVec;
use tracing::info;

use crate::constants::{fruit, score, speed, timing, RAW_LAYOUTS};
use crate::error::{GameError, GameResult};
use crate::map::layout::MazeLayout;

/// Parameters that scale with the level number.
///
/// Every value is a monotonic function of the level, anchored so that level 1 yields the base
/// timings: 7 s scatter, 20 s chase and a 10 s power-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Difficulty {
    pub ghost_speed: f32,
    pub scatter_duration: Duration,
    pub chase_duration: Duration,
    pub power_up_duration: Duration,
    /// Reported to hosts; spawning itself is threshold driven.
    pub bonus_fruit_spawn_chance: f32,
    pub bonus_fruit_points: u32,
}

impl Difficulty {
    pub fn for_level(level: u32) -> Self {
        let steps = level.saturating_sub(1);
        Self {
            ghost_speed: speed::GHOST_BASE + speed::GHOST_PER_LEVEL * steps as f32,
            scatter_duration: timing::SCATTER.saturating_sub(timing::SCATTER_PER_LEVEL * steps),
            chase_duration: timing::CHASE.saturating_sub(timing::CHASE_PER_LEVEL * steps),
            power_up_duration: timing::POWER_UP.saturating_sub(timing::POWER_UP_PER_LEVEL * steps),
            bonus_fruit_spawn_chance: (fruit::SPAWN_CHANCE_BASE + fruit::SPAWN_CHANCE_PER_LEVEL * steps as f32).min(1.0),
            bonus_fruit_points: score::FRUIT_BASE + score::FRUIT_PER_LEVEL * steps,
        }
    }
}

/// Tracks the current level and hands out its layout and difficulty.
#[derive(Debug, Clone)]
pub struct LevelManager {
    current_level: u32,
    max_level: u32,
    layouts: Vec<MazeLayout>,
    fruit_thresholds: SmallVec<[u32; 4]>,
}

impl LevelManager {
    /// A manager over the built-in layout rotation.
    pub fn new(max_level: u32, fruit_thresholds: &[u32]) -> GameResult<Self> {
        let layouts = RAW_LAYOUTS
            .iter()
            .map(|raw| MazeLayout::from_codes(raw.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_layouts(layouts, max_level, fruit_thresholds)
    }

    /// A manager over custom layouts, which rotate in the given order.
    pub fn with_layouts(layouts: Vec<MazeLayout>, max_level: u32, fruit_thresholds: &[u32]) -> GameResult<Self> {
        if layouts.is_empty() {
            return Err(GameError::InvalidState("level rotation needs at least one layout".into()));
        }

        Ok(Self {
            current_level: 1,
            max_level: max_level.max(1),
            layouts,
            fruit_thresholds: SmallVec::from_slice(fruit_thresholds),
        })
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Moves to the next level, saturating at the maximum. Returns the new level.
    pub fn next_level(&mut self) -> u32 {
        if self.current_level < self.max_level {
            self.current_level += 1;
        }
        info!(level = self.current_level, "Advanced level");
        self.current_level
    }

    pub fn reset(&mut self) {
        self.current_level = 1;
    }

    /// The layout for `level`; layouts cycle once the rotation is exhausted.
    pub fn layout(&self, level: u32) -> &MazeLayout {
        let index = level.saturating_sub(1) as usize % self.layouts.len();
        &self.layouts[index]
    }

    pub fn current_layout(&self) -> &MazeLayout {
        self.layout(self.current_level)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_level(self.current_level)
    }

    pub fn bonus_fruit_points(&self) -> u32 {
        self.difficulty().bonus_fruit_points
    }

    pub fn fruit_thresholds(&self) -> &[u32] {
        &self.fruit_thresholds
    }

    /// How many fruit thresholds `pellets_eaten` has reached.
    pub fn fruit_thresholds_reached(&self, pellets_eaten: u32) -> usize {
        self.fruit_thresholds.iter().filter(|&&threshold| pellets_eaten >= threshold).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_LEVEL;

    #[test]
    fn test_level_one_matches_base_timings() {
        let difficulty = Difficulty::for_level(1);
        assert_eq!(difficulty.ghost_speed, speed::GHOST_BASE);
        assert_eq!(difficulty.scatter_duration, Duration::from_secs(7));
        assert_eq!(difficulty.chase_duration, Duration::from_secs(20));
        assert_eq!(difficulty.power_up_duration, Duration::from_secs(10));
        assert_eq!(difficulty.bonus_fruit_points, 100);
    }

    #[test]
    fn test_difficulty_is_monotonic() {
        for level in 1..MAX_LEVEL {
            let (a, b) = (Difficulty::for_level(level), Difficulty::for_level(level + 1));
            assert!(b.ghost_speed > a.ghost_speed);
            assert!(b.scatter_duration < a.scatter_duration);
            assert!(b.chase_duration < a.chase_duration);
            assert!(b.power_up_duration < a.power_up_duration);
            assert!(b.bonus_fruit_spawn_chance > a.bonus_fruit_spawn_chance);
            assert!(b.bonus_fruit_points > a.bonus_fruit_points);
        }
    }
}
