//! The global scatter/chase alternation timer.

use std::time::Duration;

use tracing::debug;

use crate::entity::ghost::GhostMode;

/// The global scatter/chase alternation.
///
/// Starts in scatter and flips whenever the current phase's duration has elapsed, repeating
/// indefinitely. Time only moves when the caller advances it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTimer {
    scatter: Duration,
    chase: Duration,
    mode: GhostMode,
    elapsed: Duration,
}

impl ModeTimer {
    pub fn new(scatter: Duration, chase: Duration) -> Self {
        Self {
            scatter,
            chase,
            mode: GhostMode::Scatter,
            elapsed: Duration::ZERO,
        }
    }

    /// The mode ghosts should currently follow: scatter or chase.
    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    fn phase_duration(&self) -> Duration {
        match self.mode {
            GhostMode::Chase => self.chase,
            _ => self.scatter,
        }
    }

    /// Time left in the current phase.
    pub fn remaining(&self) -> Duration {
        self.phase_duration().saturating_sub(self.elapsed)
    }

    /// Advances the timer, returning the new mode if the phase changed.
    ///
    /// A step longer than a phase carries its remainder over, so the timer never drifts from
    /// the cadence however coarse the ticks are.
    pub fn advance(&mut self, dt: Duration) -> Option<GhostMode> {
        if self.scatter.is_zero() && self.chase.is_zero() {
            return None;
        }

        let before = self.mode;
        self.elapsed += dt;
        while self.elapsed >= self.phase_duration() {
            self.elapsed -= self.phase_duration();
            self.mode = match self.mode {
                GhostMode::Scatter => GhostMode::Chase,
                _ => GhostMode::Scatter,
            };
        }

        (self.mode != before).then(|| {
            debug!(mode = %self.mode, "Alternation timer flipped");
            self.mode
        })
    }

    /// Restarts in scatter with new phase lengths.
    pub fn reset(&mut self, scatter: Duration, chase: Duration) {
        *self = Self::new(scatter, chase);
    }
}
