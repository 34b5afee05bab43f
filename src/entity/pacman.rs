//! Pac-Man entity implementation.

use std::time::Duration;

use glam::IVec2;
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{score, speed, timing, STARTING_LIVES};
use crate::entity::{Entity, Mover};
use crate::map::{board::Board, layout::CellKind};

/// Something Pac-Man ate off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    Pellet,
    PowerPellet,
    BonusFruit { points: u32 },
}

impl Consumed {
    /// Points awarded for eating this item.
    pub fn points(self) -> u32 {
        match self {
            Consumed::Pellet => score::PELLET,
            Consumed::PowerPellet => score::POWER_PELLET,
            Consumed::BonusFruit { points } => points,
        }
    }
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Pacman {
    mover: Mover,
    score: u32,
    lives: u8,
    powered: bool,
    /// Time since the current power-up was activated.
    power_elapsed: Duration,
    /// Length of a power-up on the current level.
    power_duration: Duration,
    /// Ghosts eaten during the current power-up window.
    ghost_streak: u32,
}

impl Entity for Pacman {
    fn mover(&self) -> &Mover {
        &self.mover
    }

    fn mover_mut(&mut self) -> &mut Mover {
        &mut self.mover
    }

    /// Back to the spawn cell with any power-up cleared. Score and lives are untouched.
    fn reset(&mut self) {
        self.mover.reset();
        self.clear_power_up();
    }
}

impl Pacman {
    pub fn new(spawn: IVec2) -> Self {
        Self::with_lives(spawn, STARTING_LIVES)
    }

    pub fn with_lives(spawn: IVec2, lives: u8) -> Self {
        Self {
            mover: Mover::new(spawn, speed::PACMAN),
            score: 0,
            lives,
            powered: false,
            power_elapsed: Duration::ZERO,
            power_duration: timing::POWER_UP,
            ghost_streak: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn is_powered_up(&self) -> bool {
        self.powered
    }

    pub fn ghost_streak(&self) -> u32 {
        self.ghost_streak
    }

    pub fn power_duration(&self) -> Duration {
        self.power_duration
    }

    /// Sets how long the next power-up lasts. An active power-up keeps its original length.
    pub fn set_power_duration(&mut self, duration: Duration) {
        self.power_duration = duration;
    }

    /// Time left on the active power-up, zero when not powered.
    pub fn power_time_remaining(&self) -> Duration {
        if self.powered {
            self.power_duration.saturating_sub(self.power_elapsed)
        } else {
            Duration::ZERO
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn add_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    /// Moves to a new spawn point, as used when a new maze is loaded.
    pub fn respawn_at(&mut self, spawn: IVec2) {
        self.mover.set_spawn(spawn);
        self.reset();
    }

    /// Starts a fresh session: zero score, `lives` lives, back at spawn.
    pub fn restart(&mut self, lives: u8) {
        self.score = 0;
        self.lives = lives;
        self.reset();
    }

    /// Advances the power-up clock by `dt`, expiring it once the full duration has elapsed.
    pub fn update_power(&mut self, dt: Duration) {
        if !self.powered {
            return;
        }
        self.power_elapsed += dt;
        if self.power_elapsed >= self.power_duration {
            debug!(elapsed = ?self.power_elapsed, "Power-up expired");
            self.clear_power_up();
        }
    }

    /// Runs one tick: the power-up clock first, then every step the speed allows, eating after
    /// each step.
    pub fn update(&mut self, board: &mut Board, dt: Duration, fruit_points: u32) -> SmallVec<[Consumed; 2]> {
        self.update_power(dt);
        self.advance(board, fruit_points)
    }

    /// Moves and eats without touching the power-up clock.
    pub fn advance(&mut self, board: &mut Board, fruit_points: u32) -> SmallVec<[Consumed; 2]> {
        let mut consumed = SmallVec::new();
        for _ in 0..self.mover.accumulate() {
            if !self.mover.step(board) {
                break;
            }
            consumed.extend(self.eat(board, fruit_points));
        }
        consumed
    }

    /// Eats whatever occupies Pac-Man's cell.
    ///
    /// Pellet, power pellet and bonus fruit are checked in that order; a cell only ever holds
    /// one of them. A power pellet activates the power-up.
    pub fn eat(&mut self, board: &mut Board, fruit_points: u32) -> Option<Consumed> {
        let position = self.position();
        let consumed = match board.cell_at(position) {
            CellKind::Pellet if board.remove_pellet(position) => Consumed::Pellet,
            CellKind::PowerPellet if board.remove_pellet(position) => Consumed::PowerPellet,
            CellKind::BonusFruit if board.remove_bonus_fruit(position) => Consumed::BonusFruit { points: fruit_points },
            _ => return None,
        };

        self.add_score(consumed.points());
        if consumed == Consumed::PowerPellet {
            self.activate_power_up();
        }
        Some(consumed)
    }

    /// Starts (or restarts) a power-up window and clears the ghost streak.
    pub fn activate_power_up(&mut self) {
        self.powered = true;
        self.power_elapsed = Duration::ZERO;
        self.ghost_streak = 0;
        debug!(duration = ?self.power_duration, "Power-up activated");
    }

    fn clear_power_up(&mut self) {
        self.powered = false;
        self.power_elapsed = Duration::ZERO;
        self.ghost_streak = 0;
    }

    /// Awards points for a ghost: 200, 400, 800, 1600 across one power-up window.
    ///
    /// Returns `None`, awarding nothing, when Pac-Man is not powered up.
    pub fn eat_ghost(&mut self) -> Option<u32> {
        if !self.powered {
            return None;
        }
        let points = score::GHOST_BASE.saturating_mul(1u32.checked_shl(self.ghost_streak).unwrap_or(u32::MAX));
        self.ghost_streak += 1;
        self.add_score(points);
        Some(points)
    }

    /// Loses a life, clearing any power-up and returning to spawn. Returns the lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.reset();
        debug!(lives = self.lives, "Pac-Man lost a life");
        self.lives
    }
}
