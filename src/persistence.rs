//! High-score storage.
//!
//! The simulation itself never performs I/O. Hosts hand a store to the
//! [`HighScoreObserver`](crate::events::HighScoreObserver), which reads it once at session
//! start and writes whenever the running score beats it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PersistenceError;

/// Reads and writes a single high-score value.
pub trait HighScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError>;
    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError>;
}

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHighScoreStore {
    value: u32,
    saves: u32,
}

impl MemoryHighScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value, saves: 0 }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Number of successful writes.
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        self.value = high_score;
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// A store backed by a small JSON document on disk. A missing file reads as zero.
#[derive(Debug, Clone)]
pub struct JsonFileHighScoreStore {
    path: PathBuf,
}

impl JsonFileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileHighScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No high score file yet");
                return Ok(0);
            }
            Err(error) => return Err(error.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&contents)?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
