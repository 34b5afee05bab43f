//! Moving entities: the shared movement primitive and the capability trait built on it.
//!
//! Pac-Man and the ghosts each embed a [`Mover`], which owns position, heading, buffered turn
//! input and sub-cell speed. The [`Entity`] trait exposes that mover plus the per-type reset, so
//! there is no base type that could be constructed on its own.

use glam::IVec2;

use crate::map::{board::Board, direction::Direction};

pub mod factory;
pub mod ghost;
pub mod pacman;
pub mod strategy;

/// Position, heading and speed of something that walks the maze one cell at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Mover {
    position: IVec2,
    spawn: IVec2,
    /// Cells per tick. Fractional speeds accumulate in `progress` until a whole step is due.
    speed: f32,
    progress: f32,
    direction: Option<Direction>,
    next_direction: Option<Direction>,
}

impl Mover {
    pub fn new(spawn: IVec2, speed: f32) -> Self {
        Self {
            position: spawn,
            spawn,
            speed,
            progress: 0.0,
            direction: None,
            next_direction: None,
        }
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn spawn(&self) -> IVec2 {
        self.spawn
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn set_direction(&mut self, direction: Option<Direction>) {
        self.direction = direction;
    }

    /// Buffers a turn to be taken as soon as it is legal.
    pub fn set_next_direction(&mut self, direction: Direction) {
        self.next_direction = Some(direction);
    }

    /// Flips the current heading. A stationary mover stays stationary.
    pub fn reverse(&mut self) {
        self.direction = self.direction.map(Direction::opposite);
    }

    /// Teleports the mover without touching its heading.
    pub fn place(&mut self, position: IVec2) {
        self.position = position;
    }

    /// Moves the spawn point; the next reset returns here.
    pub fn set_spawn(&mut self, spawn: IVec2) {
        self.spawn = spawn;
    }

    /// The cell a step in `direction` would land on, or `None` if the step is illegal.
    ///
    /// Steps into walls or off the grid are illegal, except that leaving a tunnel row through a
    /// side edge wraps to the opposite edge of the same row. Vertical edges never wrap.
    pub fn step_target(&self, board: &Board, direction: Direction) -> Option<IVec2> {
        let target = self.position + direction.as_ivec2();
        if board.contains(target) {
            return (!board.is_wall(target)).then_some(target);
        }

        if direction.is_horizontal() && board.is_tunnel_row(target.y) {
            let wrapped = IVec2::new(target.x.rem_euclid(board.width()), target.y);
            return (!board.is_wall(wrapped)).then_some(wrapped);
        }

        None
    }

    /// True if a step in `direction` is legal from the current cell.
    pub fn can_step(&self, board: &Board, direction: Direction) -> bool {
        self.step_target(board, direction).is_some()
    }

    /// Takes a single step.
    ///
    /// A buffered turn is committed first if it is legal. Then the mover steps along its heading;
    /// an illegal step leaves it in place with the heading kept, so a turn buffered later can
    /// still be taken. Returns whether the position changed.
    pub fn step(&mut self, board: &Board) -> bool {
        if let Some(next) = self.next_direction {
            if self.can_step(board, next) {
                self.direction = Some(next);
                self.next_direction = None;
            }
        }

        let Some(direction) = self.direction else {
            return false;
        };

        match self.step_target(board, direction) {
            Some(target) => {
                self.position = target;
                true
            }
            None => false,
        }
    }

    /// Banks one tick of speed and returns how many whole steps are now due.
    pub fn accumulate(&mut self) -> u32 {
        self.progress += self.speed;
        let steps = self.progress.floor();
        self.progress -= steps;
        steps as u32
    }

    /// Returns to the spawn point with no heading and no buffered turn.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.direction = None;
        self.next_direction = None;
        self.progress = 0.0;
    }
}

/// Capabilities shared by everything that moves through the maze.
pub trait Entity {
    /// Returns the entity's movement state.
    fn mover(&self) -> &Mover;

    /// Returns the entity's movement state for modification.
    fn mover_mut(&mut self) -> &mut Mover;

    /// Restores the entity to how it stood at the start of a life.
    fn reset(&mut self);

    fn position(&self) -> IVec2 {
        self.mover().position()
    }

    fn direction(&self) -> Option<Direction> {
        self.mover().direction()
    }

    /// Sets the next direction for the entity to take.
    ///
    /// The direction is buffered and will be applied at the next opportunity.
    fn set_next_direction(&mut self, direction: Direction) {
        self.mover_mut().set_next_direction(direction);
    }
}
