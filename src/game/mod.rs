//! This module contains the game orchestrator.
//!
//! [`GameManager`] owns the board, Pac-Man and the ghosts and is the only thing that mutates
//! them. Hosts drive it with [`GameManager::tick`] at a fixed cadence, forward input through
//! [`GameManager::move_pacman`] or [`GameManager::handle_command`], and read a
//! [`GameSnapshot`] back after each tick.

use std::sync::Arc;
use std::time::Duration;

use glam::IVec2;
use parking_lot::Mutex;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::Serialize;
use smallvec::SmallVec;
use strum_macros::Display;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::entity::factory::GhostFactory;
use crate::entity::ghost::{Ghost, GhostMode, GhostTick, GhostType};
use crate::entity::pacman::{Consumed, Pacman};
use crate::entity::strategy::TargetContext;
use crate::entity::Entity;
use crate::error::GameResult;
use crate::events::{
    observer, EventBus, GameCommand, GameEvent, HighScoreObserver, ObserverHandle, Statistics, StatisticsObserver,
};
use crate::level::{Difficulty, LevelManager};
use crate::map::{board::Board, direction::Direction, layout::CellKind};
use crate::persistence::HighScoreStore;

use self::modes::ModeTimer;
use self::scheduler::{Deferred, Scheduler, TaskId};
use self::snapshot::{GameSnapshot, GhostSnapshot, PacmanSnapshot};

pub mod modes;
pub mod scheduler;
pub mod snapshot;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GameStage {
    /// A maze is loaded and waiting for the start command.
    Ready,
    Playing,
    Paused,
    /// The maze is cleared; the next one loads after a short delay.
    LevelComplete,
    GameOver,
}

#[derive(Debug, Clone, Copy)]
struct BonusFruit {
    position: IVec2,
    elapsed: Duration,
}

/// The simulation orchestrator.
pub struct GameManager {
    config: GameConfig,
    board: Board,
    pacman: Pacman,
    ghosts: SmallVec<[Ghost; 4]>,
    levels: LevelManager,
    difficulty: Difficulty,
    mode_timer: ModeTimer,
    scheduler: Scheduler,
    events: EventBus,
    statistics: Arc<Mutex<StatisticsObserver>>,
    high_scores: Option<Arc<Mutex<HighScoreObserver>>>,
    rng: SmallRng,
    fruit: Option<BonusFruit>,
    /// Fruit thresholds already handled on this level.
    fruit_thresholds_triggered: usize,
    collision_cooldown: Option<TaskId>,
    level_advance: Option<TaskId>,
    stage: GameStage,
    /// Score at which the next extra life is awarded.
    next_extra_life: u32,
}

impl GameManager {
    /// A session over the built-in layouts, seeded from the thread RNG.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        let levels = LevelManager::new(config.max_level, &config.fruit_thresholds)?;
        let rng = SmallRng::from_rng(&mut rand::rng());
        Ok(Self::build(config, levels, rng))
    }

    /// A session over the built-in layouts with deterministic randomness.
    pub fn with_seed(config: GameConfig, seed: u64) -> GameResult<Self> {
        let levels = LevelManager::new(config.max_level, &config.fruit_thresholds)?;
        Ok(Self::build(config, levels, SmallRng::seed_from_u64(seed)))
    }

    /// A session over a custom level rotation with deterministic randomness.
    pub fn with_levels(config: GameConfig, levels: LevelManager, seed: u64) -> Self {
        Self::build(config, levels, SmallRng::seed_from_u64(seed))
    }

    fn build(config: GameConfig, levels: LevelManager, rng: SmallRng) -> Self {
        let difficulty = levels.difficulty();
        let board = Board::new(levels.current_layout());
        let mut pacman = Pacman::with_lives(GhostFactory::pacman_spawn(&board), config.starting_lives);
        pacman.set_power_duration(difficulty.power_up_duration);
        let ghosts = GhostFactory::create_all(&board, difficulty.ghost_speed);

        let statistics = observer(StatisticsObserver::default());
        let mut events = EventBus::new();
        events.attach(statistics.clone());

        info!(
            level = levels.current_level(),
            width = board.width(),
            height = board.height(),
            pellets = board.total_pellets(),
            "Game created"
        );

        Self {
            next_extra_life: config.extra_life_interval,
            mode_timer: ModeTimer::new(difficulty.scatter_duration, difficulty.chase_duration),
            config,
            board,
            pacman,
            ghosts,
            levels,
            difficulty,
            scheduler: Scheduler::new(),
            events,
            statistics,
            high_scores: None,
            rng,
            fruit: None,
            fruit_thresholds_triggered: 0,
            collision_cooldown: None,
            level_advance: None,
            stage: GameStage::Ready,
        }
    }

    /// Reads the stored high score and writes new records back to `store` as they happen.
    pub fn attach_high_score_store(&mut self, store: Box<dyn HighScoreStore + Send>) {
        if let Some(previous) = self.high_scores.take() {
            let handle: ObserverHandle = previous;
            self.events.detach(&handle);
        }
        let high_scores = observer(HighScoreObserver::new(store));
        self.events.attach(high_scores.clone());
        self.high_scores = Some(high_scores);
    }

    /// Adds an observer to the event bus. Returns false if it was already attached.
    pub fn attach(&mut self, observer: ObserverHandle) -> bool {
        self.events.attach(observer)
    }

    pub fn detach(&mut self, observer: &ObserverHandle) -> bool {
        self.events.detach(observer)
    }

    fn emit(&self, event: GameEvent) {
        self.events.notify(event);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn pacman(&self) -> &Pacman {
        &self.pacman
    }

    pub fn pacman_mut(&mut self) -> &mut Pacman {
        &mut self.pacman
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut SmallVec<[Ghost; 4]> {
        &mut self.ghosts
    }

    pub fn ghost(&self, ghost_type: GhostType) -> Option<&Ghost> {
        self.ghosts.iter().find(|ghost| ghost.ghost_type() == ghost_type)
    }

    pub fn stage(&self) -> GameStage {
        self.stage
    }

    pub fn level(&self) -> u32 {
        self.levels.current_level()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The mode the scatter/chase timer currently indicates.
    pub fn alternation_mode(&self) -> GhostMode {
        self.mode_timer.mode()
    }

    pub fn bonus_fruit(&self) -> Option<IVec2> {
        self.fruit.map(|fruit| fruit.position)
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics.lock().stats()
    }

    /// The stored high score if a store is attached, otherwise the current score.
    pub fn high_score(&self) -> u32 {
        self.high_scores
            .as_ref()
            .map_or(self.pacman.score(), |high_scores| high_scores.lock().high_score())
    }

    pub fn is_collision_cooldown_active(&self) -> bool {
        self.collision_cooldown.is_some()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Cancels one deferred action. Returns whether it was still pending.
    pub fn cancel_scheduled(&mut self, id: TaskId) -> bool {
        if self.collision_cooldown == Some(id) {
            self.collision_cooldown = None;
        }
        if self.level_advance == Some(id) {
            self.level_advance = None;
        }
        self.scheduler.cancel(id)
    }

    /// Cancels every deferred action, e.g. before the host tears the engine down.
    pub fn cancel_all_scheduled(&mut self) -> usize {
        self.collision_cooldown = None;
        self.level_advance = None;
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "Cancelled scheduled actions");
        }
        cancelled
    }

    pub fn handle_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::Move(direction) => self.move_pacman(direction),
            GameCommand::Start => {
                self.start();
            }
            GameCommand::Pause => {
                self.pause();
            }
            GameCommand::Reset => self.reset(),
        }
    }

    /// Ready to Playing. Returns whether the stage changed.
    pub fn start(&mut self) -> bool {
        if self.stage != GameStage::Ready {
            return false;
        }
        self.stage = GameStage::Playing;
        info!(level = self.level(), "Game started");
        true
    }

    /// Toggles between Playing and Paused. Returns whether the stage changed.
    pub fn pause(&mut self) -> bool {
        self.stage = match self.stage {
            GameStage::Playing => GameStage::Paused,
            GameStage::Paused => GameStage::Playing,
            _ => return false,
        };
        debug!(stage = %self.stage, "Pause toggled");
        true
    }

    /// Restarts the session from level 1. Statistics and the high score carry over.
    pub fn reset(&mut self) {
        self.cancel_all_scheduled();
        self.levels.reset();
        self.pacman.restart(self.config.starting_lives);
        self.next_extra_life = self.config.extra_life_interval;
        self.load_level();
        self.stage = GameStage::Ready;
        info!("Game reset");

        self.emit(GameEvent::LevelStarted { level: self.level() });
        self.emit(GameEvent::LivesChanged {
            lives: self.pacman.lives(),
        });
        self.emit(GameEvent::ScoreChanged { score: 0 });
    }

    /// Loads the next maze, keeping Pac-Man's score and lives.
    pub fn advance_level(&mut self) {
        if let Some(id) = self.level_advance.take() {
            self.scheduler.cancel(id);
        }
        self.levels.next_level();
        self.load_level();
        self.stage = GameStage::Ready;
        self.emit(GameEvent::LevelStarted { level: self.level() });
    }

    /// Rebuilds the board, ghosts and timers for the current level.
    fn load_level(&mut self) {
        if let Some(id) = self.collision_cooldown.take() {
            self.scheduler.cancel(id);
        }

        self.difficulty = self.levels.difficulty();
        self.board = Board::new(self.levels.current_layout());
        self.ghosts = GhostFactory::create_all(&self.board, self.difficulty.ghost_speed);
        self.pacman.set_power_duration(self.difficulty.power_up_duration);
        self.pacman.respawn_at(GhostFactory::pacman_spawn(&self.board));
        self.mode_timer
            .reset(self.difficulty.scatter_duration, self.difficulty.chase_duration);
        self.fruit = None;
        self.fruit_thresholds_triggered = 0;

        debug!(level = self.level(), difficulty = ?self.difficulty, "Level loaded");
    }

    /// Advances the simulation by `dt` and returns the resulting snapshot.
    pub fn update(&mut self, dt: Duration) -> GameSnapshot {
        self.tick(dt);
        self.snapshot()
    }

    /// Advances the simulation by `dt`.
    ///
    /// Deferred actions run first, in every stage but Paused. Gameplay then only proceeds while
    /// Playing: the alternation timer, Pac-Man, each ghost, collisions, bonus fruit, level
    /// completion, and finally a score update.
    pub fn tick(&mut self, dt: Duration) {
        if self.stage == GameStage::Paused {
            return;
        }

        for (id, action) in self.scheduler.advance(dt) {
            self.run_deferred(id, action);
        }

        if self.stage != GameStage::Playing {
            return;
        }

        // The alternation holds still while ghosts are frightened
        if !self.pacman.is_powered_up() {
            if let Some(mode) = self.mode_timer.advance(dt) {
                for ghost in self.ghosts.iter_mut() {
                    ghost.sync_alternation(mode);
                }
                self.emit(GameEvent::ModeChanged { mode });
            }
        }

        let consumed = self
            .pacman
            .update(&mut self.board, dt, self.difficulty.bonus_fruit_points);
        self.apply_consumed(&consumed);
        self.resolve_collisions();

        if self.stage == GameStage::Playing {
            self.update_ghosts(dt);
            self.resolve_collisions();
        }

        if self.stage == GameStage::Playing {
            self.expire_bonus_fruit(dt);
            self.check_fruit_thresholds();
            self.check_level_complete();
        }

        self.check_extra_life();
        self.emit(GameEvent::ScoreChanged {
            score: self.pacman.score(),
        });
    }

    /// Buffers a turn and applies one tick's worth of Pac-Man movement straight away.
    ///
    /// Outside of Playing the turn is only buffered.
    pub fn move_pacman(&mut self, direction: Direction) {
        self.pacman.set_next_direction(direction);
        if self.stage != GameStage::Playing {
            return;
        }

        let consumed = self.pacman.advance(&mut self.board, self.difficulty.bonus_fruit_points);
        self.apply_consumed(&consumed);
        self.resolve_collisions();

        if self.stage == GameStage::Playing {
            self.check_fruit_thresholds();
            self.check_level_complete();
        }

        self.check_extra_life();
        self.emit(GameEvent::ScoreChanged {
            score: self.pacman.score(),
        });
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: GameSnapshot::grid(&self.board),
            pellets_eaten: self.board.pellets_eaten(),
            total_pellets: self.board.total_pellets(),
            pacman: PacmanSnapshot::from(&self.pacman),
            ghosts: self.ghosts.iter().map(GhostSnapshot::from).collect(),
            level: self.level(),
            stage: self.stage,
            paused: self.stage == GameStage::Paused,
            high_score: self.high_score(),
            statistics: self.statistics(),
            bonus_fruit: self.bonus_fruit(),
            alternation: self.mode_timer.mode(),
            bonus_fruit_spawn_chance: self.difficulty.bonus_fruit_spawn_chance,
        }
    }

    fn run_deferred(&mut self, id: TaskId, action: Deferred) {
        trace!(?id, ?action, "Running deferred action");
        match action {
            Deferred::EndCollisionCooldown => {
                if self.collision_cooldown == Some(id) {
                    self.collision_cooldown = None;
                    debug!("Collision cooldown ended");
                }
            }
            Deferred::AdvanceLevel => {
                if self.level_advance == Some(id) {
                    self.level_advance = None;
                    self.advance_level();
                }
            }
        }
    }

    fn apply_consumed(&mut self, consumed: &[Consumed]) {
        for &item in consumed {
            match item {
                Consumed::Pellet => self.emit(GameEvent::PelletEaten),
                Consumed::PowerPellet => {
                    let frightened = self
                        .ghosts
                        .iter_mut()
                        .map(|ghost| ghost.frighten())
                        .filter(|&frightened| frightened)
                        .count();
                    debug!(frightened, "Power pellet eaten");
                    self.emit(GameEvent::PowerPelletEaten);
                }
                Consumed::BonusFruit { points } => {
                    self.fruit = None;
                    debug!(points, "Bonus fruit eaten");
                    self.emit(GameEvent::BonusFruitEaten { points });
                }
            }
        }
    }

    fn update_ghosts(&mut self, dt: Duration) {
        let mut tick = GhostTick {
            targets: TargetContext {
                pacman_position: self.pacman.position(),
                pacman_direction: self.pacman.direction(),
                aggressor_position: None,
                shy_distance: self.config.shy_distance,
                arcade_quirk: self.config.arcade_targeting_quirk,
            },
            pacman_powered: self.pacman.is_powered_up(),
            alternation: self.mode_timer.mode(),
            dt,
        };

        for index in 0..self.ghosts.len() {
            // Read live, so a ghost updated earlier this tick is seen at its new cell
            tick.targets.aggressor_position = self.ghost(GhostType::Blinky).map(Ghost::position);
            self.ghosts[index].update(&self.board, &tick, &mut self.rng);
        }
    }

    /// Resolves every ghost sharing Pac-Man's cell.
    fn resolve_collisions(&mut self) {
        let position = self.pacman.position();

        for index in 0..self.ghosts.len() {
            let ghost = &self.ghosts[index];
            if ghost.position() != position {
                continue;
            }
            let ghost_type = ghost.ghost_type();

            if ghost.is_vulnerable() {
                let Some(bonus) = self.pacman.eat_ghost() else {
                    // The power-up ran out this tick; the ghost reverts on its own update
                    trace!(ghost = %ghost_type, "Frightened ghost passed after power-up expiry");
                    continue;
                };
                self.ghosts[index].on_eaten();
                info!(ghost = %ghost_type, bonus, "Ghost eaten");
                self.emit(GameEvent::GhostEaten { ghost: ghost_type, bonus });
            } else if ghost.is_dangerous() {
                if self.collision_cooldown.is_some() {
                    trace!(ghost = %ghost_type, "Collision ignored during cooldown");
                    continue;
                }
                self.kill_pacman(ghost_type);
                return;
            }
        }
    }

    fn kill_pacman(&mut self, killer: GhostType) {
        let lives = self.pacman.lose_life();
        info!(%killer, lives, "Pac-Man died");
        self.emit(GameEvent::PacmanDied { lives });
        self.emit(GameEvent::LivesChanged { lives });

        if lives == 0 {
            self.stage = GameStage::GameOver;
            self.cancel_all_scheduled();
            info!(score = self.pacman.score(), level = self.level(), "Game over");
            self.emit(GameEvent::GameOver {
                score: self.pacman.score(),
            });
            return;
        }

        let alternation = self.mode_timer.mode();
        for ghost in self.ghosts.iter_mut() {
            ghost.reset();
            ghost.sync_alternation(alternation);
        }
        self.collision_cooldown = Some(
            self.scheduler
                .schedule(self.config.collision_cooldown, Deferred::EndCollisionCooldown),
        );
    }

    fn expire_bonus_fruit(&mut self, dt: Duration) {
        let Some(fruit) = self.fruit.as_mut() else {
            return;
        };
        fruit.elapsed += dt;
        if fruit.elapsed < self.config.bonus_fruit_duration {
            return;
        }

        let position = fruit.position;
        self.board.remove_bonus_fruit(position);
        self.fruit = None;
        debug!(?position, "Bonus fruit expired");
        self.emit(GameEvent::BonusFruitExpired);
    }

    /// Spawns a fruit the first time each threshold is reached. A threshold reached while a
    /// fruit is already out is spent without spawning another.
    fn check_fruit_thresholds(&mut self) {
        let reached = self.levels.fruit_thresholds_reached(self.board.pellets_eaten());
        if reached <= self.fruit_thresholds_triggered {
            return;
        }
        self.fruit_thresholds_triggered = reached;

        if self.fruit.is_some() {
            debug!("Fruit threshold reached with a fruit already out");
            return;
        }
        self.spawn_bonus_fruit();
    }

    /// Places a fruit on a random empty cell away from Pac-Man. Returns where, if anywhere.
    pub fn spawn_bonus_fruit(&mut self) -> Option<IVec2> {
        let pacman = self.pacman.position();
        let candidates: Vec<IVec2> = self
            .board
            .find_empty_spaces()
            .filter(|&position| position != pacman && self.board.cell_at(position) == CellKind::Empty)
            .collect();

        let Some(&position) = candidates.choose(&mut self.rng) else {
            debug!("No empty cell for a bonus fruit");
            return None;
        };

        if let Some(previous) = self.fruit.take() {
            self.board.remove_bonus_fruit(previous.position);
        }
        self.board.spawn_bonus_fruit(position);
        self.fruit = Some(BonusFruit {
            position,
            elapsed: Duration::ZERO,
        });
        debug!(?position, "Bonus fruit spawned");
        self.emit(GameEvent::BonusFruitSpawned { position });
        Some(position)
    }

    fn check_level_complete(&mut self) {
        if self.stage != GameStage::Playing || !self.board.is_level_complete() {
            return;
        }

        self.stage = GameStage::LevelComplete;
        if let Some(fruit) = self.fruit.take() {
            self.board.remove_bonus_fruit(fruit.position);
        }
        info!(level = self.level(), score = self.pacman.score(), "Level complete");
        self.emit(GameEvent::LevelComplete { level: self.level() });
        self.level_advance = Some(
            self.scheduler
                .schedule(self.config.level_advance_delay, Deferred::AdvanceLevel),
        );
    }

    fn check_extra_life(&mut self) {
        let interval = self.config.extra_life_interval;
        if interval == 0 || self.stage == GameStage::GameOver {
            return;
        }

        while self.pacman.score() >= self.next_extra_life {
            self.pacman.add_life();
            self.next_extra_life = self.next_extra_life.saturating_add(interval);
            info!(lives = self.pacman.lives(), "Extra life awarded");
            self.emit(GameEvent::LivesChanged {
                lives: self.pacman.lives(),
            });
            if self.next_extra_life == u32::MAX {
                break;
            }
        }
    }
}
