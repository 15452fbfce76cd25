//! Time provider abstraction
//!
//! Session tokens carry issue and expiry timestamps, so the login manager reads time through
//! a [`Clock`]. Production code uses [`SystemClock`]; tests drive expiry with [`FixedClock`].
//!
//! # Example
//!
//! ```
//! use tabkeep::{Clock, FixedClock};
//!
//! let clock = FixedClock::new(1_000);
//! assert_eq!(clock.now_secs(), 1);
//! clock.advance_secs(60);
//! assert_eq!(clock.now_secs(), 61);
//! ```

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// A time provider for getting current timestamps.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Get current time as seconds since Unix epoch.
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock.
///
/// Unlike the system clock it never moves on its own; call [`FixedClock::advance`] or
/// [`FixedClock::set`] to change the time it reports.
pub struct FixedClock {
    millis: Mutex<u64>,
}

impl FixedClock {
    /// Create a new fixed clock with the given initial time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner) += ms;
    }

    /// Advance the clock by the given number of seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs * 1000);
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, ms: u64) {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner) = ms;
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        *self.millis.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}

impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &self.now_millis())
            .finish()
    }
}
