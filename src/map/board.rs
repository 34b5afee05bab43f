//! The maze grid and pellet bookkeeping.

use glam::IVec2;
use tracing::trace;

use crate::map::layout::{CellKind, MazeLayout};

/// The game board.
///
/// The board keeps the live grid alongside an immutable copy of the layout it was built from,
/// so that a reset restores every pellet in place without reallocating.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// The current state of the maze.
    grid: Vec<CellKind>,
    /// The maze as it was loaded.
    original: Box<[CellKind]>,
    total_pellets: u32,
    pellets_eaten: u32,
}

impl Board {
    /// Creates a board from a parsed layout.
    pub fn new(layout: &MazeLayout) -> Self {
        let original: Box<[CellKind]> = layout.cells().into();
        let total_pellets = original.iter().filter(|cell| cell.is_pellet()).count() as u32;

        Self {
            width: layout.width(),
            height: layout.height(),
            grid: original.to_vec(),
            original,
            total_pellets,
            pellets_eaten: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width as i32
    }

    pub fn height(&self) -> i32 {
        self.height as i32
    }

    pub fn total_pellets(&self) -> u32 {
        self.total_pellets
    }

    pub fn pellets_eaten(&self) -> u32 {
        self.pellets_eaten
    }

    /// True if `pos` lies inside the grid.
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos).then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Returns the cell at `pos`. Anything outside the grid reads as a wall.
    pub fn cell_at(&self, pos: IVec2) -> CellKind {
        self.index(pos).map_or(CellKind::Wall, |i| self.grid[i])
    }

    pub fn is_wall(&self, pos: IVec2) -> bool {
        self.cell_at(pos) == CellKind::Wall
    }

    /// Removes a pellet or power pellet at `pos`.
    ///
    /// Returns whether one was present; the eaten counter only moves when it was.
    pub fn remove_pellet(&mut self, pos: IVec2) -> bool {
        match self.index(pos) {
            Some(i) if self.grid[i].is_pellet() => {
                self.grid[i] = CellKind::Empty;
                self.pellets_eaten += 1;
                trace!(x = pos.x, y = pos.y, eaten = self.pellets_eaten, "Pellet removed");
                true
            }
            _ => false,
        }
    }

    /// Places a bonus fruit at `pos`. Only succeeds on an empty cell.
    pub fn spawn_bonus_fruit(&mut self, pos: IVec2) -> bool {
        match self.index(pos) {
            Some(i) if self.grid[i] == CellKind::Empty => {
                self.grid[i] = CellKind::BonusFruit;
                true
            }
            _ => false,
        }
    }

    /// Removes a bonus fruit at `pos`, returning whether one was present.
    pub fn remove_bonus_fruit(&mut self, pos: IVec2) -> bool {
        match self.index(pos) {
            Some(i) if self.grid[i] == CellKind::BonusFruit => {
                self.grid[i] = CellKind::Empty;
                true
            }
            _ => false,
        }
    }

    /// Lazily yields every empty or pellet cell, row by row.
    pub fn find_empty_spaces(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.positions()
            .filter(|&pos| matches!(self.cell_at(pos), CellKind::Empty | CellKind::Pellet))
    }

    /// Every position on the board, row by row.
    pub fn positions(&self) -> impl Iterator<Item = IVec2> {
        let (width, height) = (self.width(), self.height());
        (0..height).flat_map(move |y| (0..width).map(move |x| IVec2::new(x, y)))
    }

    /// The nearest non-wall cell to `pos`, searching outward in Manhattan rings.
    ///
    /// Within a ring, cells are visited by row then column so the result is deterministic.
    pub fn nearest_open(&self, pos: IVec2) -> Option<IVec2> {
        let max_radius = self.width() + self.height();
        (0..=max_radius).find_map(|radius| {
            (-radius..=radius).find_map(|dy| {
                let dx = radius - dy.abs();
                let mut candidates = [IVec2::new(pos.x - dx, pos.y + dy), IVec2::new(pos.x + dx, pos.y + dy)];
                if dx == 0 {
                    candidates[1] = candidates[0];
                }
                candidates
                    .into_iter()
                    .find(|&c| self.contains(c) && !self.is_wall(c))
            })
        })
    }

    /// True once every pellet has been eaten.
    pub fn is_level_complete(&self) -> bool {
        self.pellets_eaten == self.total_pellets
    }

    /// Restores the original layout in place and zeroes the eaten counter.
    pub fn reset(&mut self) {
        self.grid.copy_from_slice(&self.original);
        self.pellets_eaten = 0;
    }

    /// The live grid, row by row.
    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.grid.chunks(self.width)
    }

    /// True if the live grid matches the layout it was built from.
    pub fn is_pristine(&self) -> bool {
        *self.grid == *self.original
    }

    /// True if the row is open on both side edges of the original layout.
    pub fn is_tunnel_row(&self, y: i32) -> bool {
        if y < 0 || y >= self.height() {
            return false;
        }
        let row = &self.original[y as usize * self.width..(y as usize + 1) * self.width];
        row[0] != CellKind::Wall && row[self.width - 1] != CellKind::Wall
    }
}
