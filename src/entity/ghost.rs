//! Ghost entity implementation.
//!
//! A ghost is a [`Mover`] plus a mode state machine. The mode picks the targeting [`Strategy`]
//! and the ghost's speed; the ghost type fixes its chase personality for life.

use std::time::Duration;

use glam::IVec2;
use rand::Rng;
use serde::Serialize;
use strum_macros::{Display, EnumIter};
use tracing::{debug, trace};

use crate::constants::speed;
use crate::entity::strategy::{select_toward, Strategy, TargetContext};
use crate::entity::{Entity, Mover};
use crate::map::{board::Board, direction::Direction};

/// The four classic ghost types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostType {
    /// The targeting rule this ghost follows while chasing.
    pub const fn chase_strategy(self) -> Strategy {
        match self {
            GhostType::Blinky => Strategy::DirectChase,
            GhostType::Pinky => Strategy::Ambush,
            GhostType::Inky => Strategy::Pincer,
            GhostType::Clyde => Strategy::Shy,
        }
    }
}

/// The ghost state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
    Eaten,
    /// Idle inside the ghost house. Ghosts start outside, so nothing enters this mode on its
    /// own; hosts may park a ghost here with [`Ghost::set_mode`].
    InHouse,
}

impl GhostMode {
    /// True for the two modes driven by the global scatter/chase timer.
    pub const fn is_alternating(self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }
}

/// Everything a ghost observes during its per-tick update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostTick {
    pub targets: TargetContext,
    pub pacman_powered: bool,
    /// The mode the scatter/chase timer currently indicates.
    pub alternation: GhostMode,
    pub dt: Duration,
}

/// A ghost entity.
#[derive(Debug, Clone)]
pub struct Ghost {
    mover: Mover,
    ghost_type: GhostType,
    mode: GhostMode,
    /// Time spent in the current mode.
    mode_elapsed: Duration,
    /// Fixed scatter target, usually outside the walkable maze.
    home_corner: IVec2,
    /// Speed in the alternating modes; the other modes derive from it.
    normal_speed: f32,
}

impl Entity for Ghost {
    fn mover(&self) -> &Mover {
        &self.mover
    }

    fn mover_mut(&mut self) -> &mut Mover {
        &mut self.mover
    }

    fn reset(&mut self) {
        self.mover.reset();
        self.set_mode(GhostMode::Scatter);
    }
}

impl Ghost {
    /// Creates a ghost in scatter mode at `spawn`. The spawn cell doubles as the cell an eaten
    /// ghost returns to.
    pub fn new(ghost_type: GhostType, spawn: IVec2, home_corner: IVec2, normal_speed: f32) -> Self {
        Self {
            mover: Mover::new(spawn, normal_speed),
            ghost_type,
            mode: GhostMode::Scatter,
            mode_elapsed: Duration::ZERO,
            home_corner,
            normal_speed,
        }
    }

    pub fn ghost_type(&self) -> GhostType {
        self.ghost_type
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn mode_elapsed(&self) -> Duration {
        self.mode_elapsed
    }

    pub fn home_corner(&self) -> IVec2 {
        self.home_corner
    }

    /// The cell an eaten ghost heads back to.
    pub fn home(&self) -> IVec2 {
        self.mover.spawn()
    }

    pub fn normal_speed(&self) -> f32 {
        self.normal_speed
    }

    /// Speed is a pure function of mode.
    pub fn speed_for(&self, mode: GhostMode) -> f32 {
        match mode {
            GhostMode::Scatter | GhostMode::Chase => self.normal_speed,
            GhostMode::Frightened => self.normal_speed * speed::FRIGHTENED_FACTOR,
            GhostMode::Eaten => speed::EATEN,
            GhostMode::InHouse => 0.0,
        }
    }

    /// Enters `mode`, restarting the mode clock and applying the mode's speed.
    pub fn set_mode(&mut self, mode: GhostMode) {
        if mode != self.mode {
            debug!(ghost = %self.ghost_type, from = %self.mode, to = %mode, "Ghost mode changed");
        }
        self.mode = mode;
        self.mode_elapsed = Duration::ZERO;
        self.mover.set_speed(self.speed_for(mode));
    }

    /// Follows the global scatter/chase timer. Ghosts outside the alternating modes ignore it.
    ///
    /// Switching between scatter and chase reverses the ghost, the one time a reversal is allowed
    /// outside of frightened entry. Returns whether the mode changed.
    pub fn sync_alternation(&mut self, mode: GhostMode) -> bool {
        if !self.mode.is_alternating() || !mode.is_alternating() || self.mode == mode {
            return false;
        }
        self.set_mode(mode);
        self.mover.reverse();
        true
    }

    /// Power pellet reaction: scatter and chase ghosts turn frightened and reverse on the spot.
    ///
    /// Returns whether the ghost became frightened.
    pub fn frighten(&mut self) -> bool {
        if !self.mode.is_alternating() {
            return false;
        }
        self.set_mode(GhostMode::Frightened);
        self.mover.reverse();
        true
    }

    /// Pac-Man caught this ghost.
    pub fn on_eaten(&mut self) {
        self.set_mode(GhostMode::Eaten);
    }

    pub fn is_vulnerable(&self) -> bool {
        self.mode == GhostMode::Frightened
    }

    /// True if touching this ghost costs Pac-Man a life.
    pub fn is_dangerous(&self) -> bool {
        self.mode.is_alternating()
    }

    /// The strategy for the current mode, if the mode is strategy-driven.
    pub fn active_strategy(&self) -> Option<Strategy> {
        match self.mode {
            GhostMode::Chase => Some(self.ghost_type.chase_strategy()),
            GhostMode::Scatter => Some(Strategy::Scatter),
            GhostMode::Frightened => Some(Strategy::Frightened),
            GhostMode::Eaten | GhostMode::InHouse => None,
        }
    }

    /// Advances the ghost by one tick.
    ///
    /// Mode exits are evaluated first: a frightened ghost whose power-up has run out rejoins the
    /// alternation, and an eaten ghost standing on its home cell resumes scattering. Then the
    /// ghost takes however many steps its speed has banked. An eaten ghost that arrives home
    /// mid-update switches to scatter on the spot and stops for the tick.
    pub fn update<R: Rng + ?Sized>(&mut self, board: &Board, tick: &GhostTick, rng: &mut R) {
        self.mode_elapsed += tick.dt;

        match self.mode {
            GhostMode::Frightened if !tick.pacman_powered => self.set_mode(tick.alternation),
            GhostMode::Eaten if self.position() == self.home() => self.set_mode(GhostMode::Scatter),
            _ => {}
        }

        for _ in 0..self.mover.accumulate() {
            let direction = match self.active_strategy() {
                Some(strategy) => strategy.next_move(&self.mover, self.home_corner, board, &tick.targets, rng),
                None if self.mode == GhostMode::Eaten => self.direction_home(board),
                None => None,
            };

            let Some(direction) = direction else {
                trace!(ghost = %self.ghost_type, mode = %self.mode, "Ghost has no move this step");
                break;
            };

            self.mover.set_direction(Some(direction));
            self.mover.step(board);

            if self.mode == GhostMode::Eaten && self.position() == self.home() {
                self.set_mode(GhostMode::Scatter);
                break;
            }
        }
    }

    /// Steers an eaten ghost back to its home cell by the nearest-tile rule, without reversing.
    fn direction_home(&self, board: &Board) -> Option<Direction> {
        if self.position() == self.home() {
            return None;
        }
        select_toward(&self.mover, board, self.home())
    }
}
