//! This module defines the maze: cell kinds, layout parsing and the live board.

pub mod board;
pub mod direction;
pub mod layout;
