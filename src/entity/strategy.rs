//! Ghost targeting strategies.
//!
//! Every strategy except [`Strategy::Frightened`] reduces to a target tile. The ghost then picks,
//! among its legal non-reversing moves, the one whose destination lies closest to that tile in
//! straight-line distance. Ties go to the first candidate in [`Direction::DIRECTIONS`] order
//! (Up, Down, Left, Right), which keeps ghost behavior fully deterministic for a given target.

use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::Display;

use crate::constants::ghost::{AMBUSH_LOOKAHEAD, PINCER_LOOKAHEAD};
use crate::entity::Mover;
use crate::map::{
    board::Board,
    direction::{heading_vector, Direction},
};

/// A targeting rule. One per ghost personality, plus the two shared by every ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Target Pac-Man's cell.
    DirectChase,
    /// Target the cell four tiles ahead of Pac-Man.
    Ambush,
    /// Double the vector from the aggressive ghost to the cell two tiles ahead of Pac-Man.
    Pincer,
    /// Chase from afar, retreat to the home corner when close.
    Shy,
    /// Target the home corner.
    Scatter,
    /// No target; wander at random.
    Frightened,
}

/// What a strategy may observe about the world beyond the ghost itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetContext {
    pub pacman_position: IVec2,
    pub pacman_direction: Option<Direction>,
    /// Live position of the aggressive ghost, used by [`Strategy::Pincer`].
    pub aggressor_position: Option<IVec2>,
    /// Distance, in tiles, inside which [`Strategy::Shy`] gives up the chase.
    pub shy_distance: i32,
    /// Reproduce the arcade overflow: looking ahead while facing up also shifts left.
    pub arcade_quirk: bool,
}

impl TargetContext {
    /// The cell `tiles` ahead of Pac-Man along its heading.
    fn ahead_of_pacman(&self, tiles: i32) -> IVec2 {
        let mut ahead = self.pacman_position + heading_vector(self.pacman_direction) * tiles;
        if self.arcade_quirk && self.pacman_direction == Some(Direction::Up) {
            ahead.x -= tiles;
        }
        ahead
    }
}

impl Strategy {
    /// The tile this strategy steers towards, or `None` for random movement.
    pub fn target(self, ghost_position: IVec2, home_corner: IVec2, ctx: &TargetContext) -> Option<IVec2> {
        match self {
            Strategy::DirectChase => Some(ctx.pacman_position),
            Strategy::Ambush => Some(ctx.ahead_of_pacman(AMBUSH_LOOKAHEAD)),
            Strategy::Pincer => {
                let pivot = ctx.ahead_of_pacman(PINCER_LOOKAHEAD);
                let aggressor = ctx.aggressor_position.unwrap_or(ghost_position);
                Some(pivot * 2 - aggressor)
            }
            Strategy::Shy => {
                let threshold = ctx.shy_distance * ctx.shy_distance;
                if ghost_position.distance_squared(ctx.pacman_position) > threshold {
                    Some(ctx.pacman_position)
                } else {
                    Some(home_corner)
                }
            }
            Strategy::Scatter => Some(home_corner),
            Strategy::Frightened => None,
        }
    }

    /// Chooses the ghost's next heading, or `None` if it has nowhere to go.
    pub fn next_move<R: Rng + ?Sized>(
        self,
        mover: &Mover,
        home_corner: IVec2,
        board: &Board,
        ctx: &TargetContext,
        rng: &mut R,
    ) -> Option<Direction> {
        match self.target(mover.position(), home_corner, ctx) {
            Some(target) => select_toward(mover, board, target),
            None => candidate_moves(mover, board).choose(rng).copied(),
        }
    }
}

/// Directions a ghost may take from its current cell.
///
/// Walls and off-grid cells are excluded, as is reversing the current heading. Reversal is only
/// offered when it is the sole legal move, so a ghost at a dead end turns around instead of
/// stalling.
pub fn candidate_moves(mover: &Mover, board: &Board) -> SmallVec<[Direction; 4]> {
    let position = mover.position();
    let reverse = mover.direction().map(Direction::opposite);
    let open = |dir: Direction| !board.is_wall(position + dir.as_ivec2());

    let forward: SmallVec<[Direction; 4]> = Direction::DIRECTIONS
        .into_iter()
        .filter(|&dir| Some(dir) != reverse && open(dir))
        .collect();

    if !forward.is_empty() {
        return forward;
    }

    reverse.filter(|&dir| open(dir)).into_iter().collect()
}

/// The candidate move whose destination is closest to `target`; first in order on a tie.
pub fn select_toward(mover: &Mover, board: &Board, target: IVec2) -> Option<Direction> {
    let position = mover.position();
    candidate_moves(mover, board)
        .into_iter()
        .map(|dir| (dir, (position + dir.as_ivec2()).distance_squared(target)))
        .fold(None, |best: Option<(Direction, i32)>, (dir, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((dir, distance)),
        })
        .map(|(dir, _)| dir)
}
