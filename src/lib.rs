//! Pac-Man simulation core: the maze, ghost AI, level and mode timing, and game events.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod level;
pub mod logging;
pub mod map;
pub mod persistence;
