//! Centralized error types for the simulation core.
//!
//! Gameplay irregularities (illegal moves, no room for a fruit, a ghost without a legal move)
//! are not errors; they degrade to a no-op for the tick. What remains here is construction
//! and collaborator failure.

use std::io;

use glam::IVec2;

/// Main error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Error type for maze layout parsing and validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Layout has no cells")]
    Empty,

    #[error("Row {row} has width {actual}, expected {expected}")]
    Ragged { row: usize, expected: usize, actual: usize },

    #[error("Unknown cell code: {0}")]
    UnknownCode(u8),

    #[error("Unknown character in layout: {0:?}")]
    UnknownCharacter(char),

    #[error("Boundary is open at ({}, {}) outside of a tunnel row", .0.x, .0.y)]
    OpenBoundary(IVec2),
}

/// Errors raised by high-score stores.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed high score file: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for GameError {
    fn from(error: figment::Error) -> Self {
        GameError::Config(Box::new(error))
    }
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
