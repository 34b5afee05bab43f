//! Maze layout parsing and validation.

use glam::IVec2;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::error::LayoutError;

/// The kinds of cell a maze is made of.
///
/// The discriminants are the integer codes of the layout format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellKind {
    Empty = 0,
    Wall = 1,
    Pellet = 2,
    PowerPellet = 3,
    GhostHouse = 4,
    BonusFruit = 5,
}

impl CellKind {
    /// Returns the layout code for this cell kind.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True for cells Pac-Man can eat.
    pub const fn is_pellet(self) -> bool {
        matches!(self, CellKind::Pellet | CellKind::PowerPellet)
    }
}

impl TryFrom<u8> for CellKind {
    type Error = LayoutError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CellKind::Empty),
            1 => Ok(CellKind::Wall),
            2 => Ok(CellKind::Pellet),
            3 => Ok(CellKind::PowerPellet),
            4 => Ok(CellKind::GhostHouse),
            5 => Ok(CellKind::BonusFruit),
            _ => Err(LayoutError::UnknownCode(code)),
        }
    }
}

/// A rectangular grid of cells, stored row-major.
///
/// Construction guarantees the grid is non-empty and rectangular. Boundary enclosure is checked
/// separately by [`MazeLayout::validate_enclosure`], since small test arenas are often fully open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeLayout {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl MazeLayout {
    /// Parses a matrix of integer cell codes.
    pub fn from_codes<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LayoutError> {
        Self::build(rows.iter().map(|row| {
            row.as_ref()
                .iter()
                .map(|&code| CellKind::try_from(code))
                .collect::<Result<Vec<_>, _>>()
        }))
    }

    /// Parses rows of characters, one cell per character.
    pub fn from_rows(rows: &[&str]) -> Result<Self, LayoutError> {
        Self::build(
            rows.iter()
                .map(|row| row.chars().map(Self::parse_character).collect::<Result<Vec<_>, _>>()),
        )
    }

    /// Parses a single layout character into a cell kind.
    pub fn parse_character(c: char) -> Result<CellKind, LayoutError> {
        match c {
            ' ' => Ok(CellKind::Empty),
            '#' => Ok(CellKind::Wall),
            '.' => Ok(CellKind::Pellet),
            'o' => Ok(CellKind::PowerPellet),
            '=' => Ok(CellKind::GhostHouse),
            'F' => Ok(CellKind::BonusFruit),
            _ => Err(LayoutError::UnknownCharacter(c)),
        }
    }

    fn build<I>(rows: I) -> Result<Self, LayoutError>
    where
        I: Iterator<Item = Result<Vec<CellKind>, LayoutError>>,
    {
        let mut cells = Vec::new();
        let mut width = None;
        let mut height = 0;

        for (index, row) in rows.enumerate() {
            let row = row?;
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(LayoutError::Ragged {
                    row: index,
                    expected,
                    actual: row.len(),
                });
            }
            cells.extend(row);
            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Self { width, height, cells }),
            _ => Err(LayoutError::Empty),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cells in row-major order.
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// The cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<CellKind> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// True if the row is open on both side edges.
    pub fn is_tunnel_row(&self, y: usize) -> bool {
        matches!(
            (self.get(0, y), self.get(self.width - 1, y)),
            (Some(left), Some(right)) if left != CellKind::Wall && right != CellKind::Wall
        )
    }

    /// Checks the outer boundary is walled in.
    ///
    /// The top and bottom rows must be solid wall. Side edges must be wall, except on tunnel rows
    /// where both ends are open so an entity leaving one side has somewhere to land.
    pub fn validate_enclosure(&self) -> Result<(), LayoutError> {
        let last_row = self.height - 1;
        for x in 0..self.width {
            for y in [0, last_row] {
                if self.get(x, y) != Some(CellKind::Wall) {
                    return Err(LayoutError::OpenBoundary(IVec2::new(x as i32, y as i32)));
                }
            }
        }

        let last_column = self.width - 1;
        for y in 1..last_row {
            if self.is_tunnel_row(y) {
                continue;
            }
            for x in [0, last_column] {
                if self.get(x, y) != Some(CellKind::Wall) {
                    return Err(LayoutError::OpenBoundary(IVec2::new(x as i32, y as i32)));
                }
            }
        }

        Ok(())
    }
}
