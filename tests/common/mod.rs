#![allow(dead_code)]

use std::sync::Arc;

use glam::IVec2;
use parking_lot::Mutex;
use pacman_core::config::GameConfig;
use pacman_core::constants::{fruit, MAX_LEVEL};
use pacman_core::entity::strategy::TargetContext;
use pacman_core::events::{observer, GameEvent, GameObserver};
use pacman_core::game::GameManager;
use pacman_core::level::LevelManager;
use pacman_core::map::{board::Board, direction::Direction, layout::MazeLayout};

/// A 5x5 board with no walls at all. The single pellet in the corner keeps the level from
/// counting as complete.
pub const OPEN_ARENA: [&str; 5] = [".    ", "     ", "     ", "     ", "     "];

/// A walled 5x5 room with one pellet directly above the centre.
pub const ONE_PELLET_ROOM: [&str; 5] = ["#####", "# . #", "#   #", "#   #", "#####"];

pub fn layout(rows: &[&str]) -> MazeLayout {
    MazeLayout::from_rows(rows).unwrap()
}

pub fn board(rows: &[&str]) -> Board {
    Board::new(&layout(rows))
}

pub fn game_with_config(rows: &[&str], config: GameConfig) -> GameManager {
    let levels = LevelManager::with_layouts(vec![layout(rows)], MAX_LEVEL, &fruit::THRESHOLDS).unwrap();
    GameManager::with_levels(config, levels, 7)
}

pub fn game(rows: &[&str]) -> GameManager {
    game_with_config(rows, GameConfig::default())
}

/// A targeting context with Pac-Man standing at `position`.
pub fn context(position: IVec2, direction: Option<Direction>) -> TargetContext {
    TargetContext {
        pacman_position: position,
        pacman_direction: direction,
        aggressor_position: None,
        shy_distance: 8,
        arcade_quirk: false,
    }
}

/// Records every event it receives.
#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<GameEvent>,
}

impl EventRecorder {
    pub fn count(&self, predicate: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

impl GameObserver for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.push(*event);
    }
}

/// Attaches a fresh recorder to `game` and returns it.
pub fn record(game: &mut GameManager) -> Arc<Mutex<EventRecorder>> {
    let recorder = observer(EventRecorder::default());
    game.attach(recorder.clone());
    recorder
}
