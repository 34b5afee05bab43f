//! Game events and the observers that consume them.
//!
//! The [`EventBus`] keeps an ordered list of observer handles and delivers every event to each
//! of them synchronously, in attach order, from inside the tick that produced it.

use std::sync::Arc;

use glam::IVec2;
use parking_lot::Mutex;
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{debug, warn};

use crate::entity::ghost::{GhostMode, GhostType};
use crate::map::direction::Direction;
use crate::persistence::HighScoreStore;

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    PelletEaten,
    PowerPelletEaten,
    GhostEaten { ghost: GhostType, bonus: u32 },
    PacmanDied { lives: u8 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u32 },
    BonusFruitSpawned { position: IVec2 },
    BonusFruitEaten { points: u32 },
    BonusFruitExpired,
    ScoreChanged { score: u32 },
    LivesChanged { lives: u8 },
    ModeChanged { mode: GhostMode },
}

/// Player and host input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    Move(Direction),
    Start,
    /// Toggles between playing and paused.
    Pause,
    Reset,
}

impl From<Direction> for GameCommand {
    fn from(direction: Direction) -> Self {
        GameCommand::Move(direction)
    }
}

/// Receives events from the bus.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// A shared handle to an attached observer.
pub type ObserverHandle = Arc<Mutex<dyn GameObserver + Send>>;

/// Wraps an observer so it can be attached and still inspected by its owner.
pub fn observer<O: GameObserver + Send + 'static>(observer: O) -> Arc<Mutex<O>> {
    Arc::new(Mutex::new(observer))
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<ObserverHandle>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, observer: &ObserverHandle) -> Option<usize> {
        self.observers
            .iter()
            .position(|attached| std::ptr::addr_eq(Arc::as_ptr(attached), Arc::as_ptr(observer)))
    }

    /// Appends an observer. Attaching the same handle twice is a no-op; returns whether it was
    /// added.
    pub fn attach(&mut self, observer: ObserverHandle) -> bool {
        if self.position(&observer).is_some() {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes an observer, returning whether it was attached.
    pub fn detach(&mut self, observer: &ObserverHandle) -> bool {
        match self.position(observer) {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn notify(&self, event: GameEvent) {
        for observer in &self.observers {
            observer.lock().on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").field("observers", &self.observers.len()).finish()
    }
}

/// Aggregate counters for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub pellets_eaten: u32,
    pub power_pellets_eaten: u32,
    pub ghosts_eaten: u32,
    pub deaths: u32,
    pub levels_completed: u32,
    pub bonus_fruits_eaten: u32,
}

/// Counts gameplay events. Counters survive a game reset.
#[derive(Debug, Default)]
pub struct StatisticsObserver {
    stats: Statistics,
}

impl StatisticsObserver {
    pub fn stats(&self) -> Statistics {
        self.stats
    }
}

impl GameObserver for StatisticsObserver {
    fn on_event(&mut self, event: &GameEvent) {
        let counter = match event {
            GameEvent::PelletEaten => &mut self.stats.pellets_eaten,
            GameEvent::PowerPelletEaten => &mut self.stats.power_pellets_eaten,
            GameEvent::GhostEaten { .. } => &mut self.stats.ghosts_eaten,
            GameEvent::PacmanDied { .. } => &mut self.stats.deaths,
            GameEvent::LevelComplete { .. } => &mut self.stats.levels_completed,
            GameEvent::BonusFruitEaten { .. } => &mut self.stats.bonus_fruits_eaten,
            _ => return,
        };
        *counter += 1;
    }
}

/// Tracks the best score and writes it through to a store whenever it is beaten.
///
/// Store failures are logged and otherwise ignored; a broken store never stops the game.
pub struct HighScoreObserver {
    store: Box<dyn HighScoreStore + Send>,
    high_score: u32,
}

impl HighScoreObserver {
    /// Reads the stored high score. An unreadable store starts from zero.
    pub fn new(mut store: Box<dyn HighScoreStore + Send>) -> Self {
        let high_score = store.load().unwrap_or_else(|error| {
            warn!(%error, "Failed to load high score");
            0
        });
        debug!(high_score, "High score loaded");
        Self { store, high_score }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }
}

impl GameObserver for HighScoreObserver {
    fn on_event(&mut self, event: &GameEvent) {
        let GameEvent::ScoreChanged { score } = *event else {
            return;
        };
        if score <= self.high_score {
            return;
        }

        self.high_score = score;
        if let Err(error) = self.store.save(score) {
            warn!(%error, score, "Failed to save high score");
        }
    }
}

impl std::fmt::Debug for HighScoreObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScoreObserver").field("high_score", &self.high_score).finish()
    }
}

/// Logs every event at debug level.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl GameObserver for LoggingObserver {
    fn on_event(&mut self, event: &GameEvent) {
        // Score changes fire every tick
        if matches!(event, GameEvent::ScoreChanged { .. }) {
            return;
        }
        debug!(event = event.as_ref(), ?event, "Game event");
    }
}
