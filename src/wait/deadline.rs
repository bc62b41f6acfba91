//! Fixed deadline measured on tokio's clock

use crate::error::{Error, Result};
use std::time::Duration;
use tokio::time::Instant;

/// Longest accepted wait, one year
pub const MAX_WAIT_MINUTES: f64 = 525_600.0;

/// Stand-in end for a deadline past what `Instant` can represent (about 30 years)
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Convert a positive, finite number of minutes into a duration
pub fn duration_from_minutes(minutes: f64) -> Result<Duration> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(Error::InvalidDuration(format!(
            "{minutes} minutes (must be greater than zero)"
        )));
    }
    if minutes > MAX_WAIT_MINUTES {
        return Err(Error::InvalidDuration(format!(
            "{minutes} minutes (must be at most {MAX_WAIT_MINUTES})"
        )));
    }
    Duration::try_from_secs_f64(minutes * 60.0)
        .map_err(|e| Error::InvalidDuration(format!("{minutes} minutes: {e}")))
}

/// Absolute end of a wait: start instant plus duration
///
/// Uses `tokio::time::Instant` so paused-clock tests advance it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: Instant,
    duration: Duration,
}

impl Deadline {
    /// Deadline `duration` from now
    pub fn after(duration: Duration) -> Self {
        Self {
            start: Instant::now(),
            duration,
        }
    }

    /// The instant the wait ends
    ///
    /// Clamped to a far-future instant when the sum overflows.
    pub fn at(&self) -> Instant {
        self.start
            .checked_add(self.duration)
            .unwrap_or_else(|| self.start + FAR_FUTURE)
    }

    /// Configured total duration
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left, zero once passed
    pub fn remaining(&self) -> Duration {
        self.at().saturating_duration_since(Instant::now())
    }

    /// Time since the wait started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Whether the deadline has passed
    pub fn is_reached(&self) -> bool {
        self.remaining().is_zero()
    }
}
