//! Session configuration with environment overrides.

use std::time::Duration;

use figment::{providers::Env, Figment};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::constants::{fruit, ghost, score, timing, MAX_LEVEL, STARTING_LIVES};
use crate::error::GameResult;

/// Session-wide tuning. Anything that scales with the level lives in
/// [`Difficulty`](crate::level::Difficulty) instead.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct GameConfig {
    pub starting_lives: u8,
    /// Window after a death during which ghost collisions are ignored.
    pub collision_cooldown: Duration,
    /// Pause between clearing a maze and loading the next one.
    pub level_advance_delay: Duration,
    /// How long an uncollected bonus fruit stays on the board.
    pub bonus_fruit_duration: Duration,
    /// Pellet counts at which a bonus fruit appears, once each per level.
    pub fruit_thresholds: SmallVec<[u32; 4]>,
    /// A life is awarded each time the score crosses a multiple of this. Zero disables it.
    pub extra_life_interval: u32,
    pub max_level: u32,
    /// Distance in tiles inside which the shy ghost retreats.
    pub shy_distance: i32,
    /// Reproduce the arcade's up-facing lookahead offset.
    pub arcade_targeting_quirk: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: STARTING_LIVES,
            collision_cooldown: timing::COLLISION_COOLDOWN,
            level_advance_delay: timing::LEVEL_ADVANCE_DELAY,
            bonus_fruit_duration: timing::BONUS_FRUIT,
            fruit_thresholds: SmallVec::from_slice(&fruit::THRESHOLDS),
            extra_life_interval: score::EXTRA_LIFE_INTERVAL,
            max_level: MAX_LEVEL,
            shy_distance: ghost::SHY_DISTANCE,
            arcade_targeting_quirk: false,
        }
    }
}

/// Configuration as read from the environment; durations are in milliseconds.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_starting_lives")]
    starting_lives: u8,
    #[serde(default = "default_collision_cooldown_ms")]
    collision_cooldown_ms: u64,
    #[serde(default = "default_level_advance_delay_ms")]
    level_advance_delay_ms: u64,
    #[serde(default = "default_bonus_fruit_duration_ms")]
    bonus_fruit_duration_ms: u64,
    #[serde(default = "default_fruit_thresholds")]
    fruit_thresholds: Vec<u32>,
    #[serde(default = "default_extra_life_interval")]
    extra_life_interval: u32,
    #[serde(default = "default_max_level")]
    max_level: u32,
    #[serde(default = "default_shy_distance")]
    shy_distance: i32,
    #[serde(default)]
    arcade_targeting_quirk: bool,
}

impl From<RawConfig> for GameConfig {
    fn from(raw: RawConfig) -> Self {
        let mut fruit_thresholds: SmallVec<[u32; 4]> = raw.fruit_thresholds.into_iter().collect();
        fruit_thresholds.sort_unstable();
        fruit_thresholds.dedup();

        GameConfig {
            starting_lives: raw.starting_lives.max(1),
            collision_cooldown: Duration::from_millis(raw.collision_cooldown_ms),
            level_advance_delay: Duration::from_millis(raw.level_advance_delay_ms),
            bonus_fruit_duration: Duration::from_millis(raw.bonus_fruit_duration_ms),
            fruit_thresholds,
            extra_life_interval: raw.extra_life_interval,
            max_level: raw.max_level.max(1),
            shy_distance: raw.shy_distance.max(0),
            arcade_targeting_quirk: raw.arcade_targeting_quirk,
        }
    }
}

fn default_starting_lives() -> u8 {
    STARTING_LIVES
}

fn default_collision_cooldown_ms() -> u64 {
    timing::COLLISION_COOLDOWN.as_millis() as u64
}

fn default_level_advance_delay_ms() -> u64 {
    timing::LEVEL_ADVANCE_DELAY.as_millis() as u64
}

fn default_bonus_fruit_duration_ms() -> u64 {
    timing::BONUS_FRUIT.as_millis() as u64
}

fn default_fruit_thresholds() -> Vec<u32> {
    fruit::THRESHOLDS.to_vec()
}

fn default_extra_life_interval() -> u32 {
    score::EXTRA_LIFE_INTERVAL
}

fn default_max_level() -> u32 {
    MAX_LEVEL
}

fn default_shy_distance() -> i32 {
    ghost::SHY_DISTANCE
}

impl GameConfig {
    /// Loads the configuration from `PACMAN_`-prefixed environment variables, e.g.
    /// `PACMAN_STARTING_LIVES=5` or `PACMAN_FRUIT_THRESHOLDS=[30,60]`. Unset keys keep their
    /// defaults.
    pub fn from_env() -> GameResult<Self> {
        Self::from_figment(Figment::new().merge(Env::prefixed("PACMAN_")))
    }

    pub fn from_figment(figment: Figment) -> GameResult<Self> {
        Ok(figment.extract()?)
    }
}
