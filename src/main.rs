//! Headless driver: plays sessions with a random autopilot at the nominal cadence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pacman_core::config::GameConfig;
use pacman_core::constants::LOOP_TIME;
use pacman_core::entity::Entity;
use pacman_core::events::{observer, LoggingObserver};
use pacman_core::game::{GameManager, GameStage};
use pacman_core::logging::setup_logging;
use pacman_core::map::direction::Direction;
use pacman_core::persistence::JsonFileHighScoreStore;
use rand::seq::IndexedRandom;
use rand::Rng;
use thousands::Separable;
use tracing::info;

/// Simulated time after which a session is abandoned.
const MAX_TICKS: u32 = 60 * 60 * 10;

/// Chance per tick that the autopilot picks a new heading.
const TURN_CHANCE: f64 = 0.15;

pub fn main() -> Result<()> {
    setup_logging();

    let config = GameConfig::from_env().context("Failed to load configuration")?;
    let high_score_path = std::env::var_os("PACMAN_HIGH_SCORE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pacman-high-score.json"));

    let mut game = GameManager::new(config).context("Failed to build game")?;
    game.attach_high_score_store(Box::new(JsonFileHighScoreStore::new(&high_score_path)));
    game.attach(observer(LoggingObserver));
    game.start();

    let mut rng = rand::rng();
    let mut ticks = 0;
    while game.stage() != GameStage::GameOver && ticks < MAX_TICKS {
        match game.stage() {
            GameStage::Ready => {
                game.start();
            }
            GameStage::Playing if game.pacman().direction().is_none() || rng.random_bool(TURN_CHANCE) => {
                if let Some(&direction) = Direction::DIRECTIONS.choose(&mut rng) {
                    game.move_pacman(direction);
                }
            }
            _ => {}
        }

        game.tick(LOOP_TIME);
        ticks += 1;
    }

    let snapshot = game.snapshot();
    let stats = snapshot.statistics;
    info!(ticks, stage = %snapshot.stage, "Session finished");

    println!("Level reached:  {}", snapshot.level);
    println!("Final score:    {}", snapshot.pacman.score.separate_with_commas());
    println!("High score:     {}", snapshot.high_score.separate_with_commas());
    println!(
        "Eaten:          {} pellets, {} power pellets, {} ghosts, {} fruit",
        stats.pellets_eaten, stats.power_pellets_eaten, stats.ghosts_eaten, stats.bonus_fruits_eaten
    );
    println!("Deaths:         {}", stats.deaths);
    println!("High score file: {}", high_score_path.display());

    Ok(())
}
