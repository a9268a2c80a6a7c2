//! # Clock Port
//!
//! Source of the current time in unix seconds.
//!
//! Escrow operations read the clock exactly once and use that value for
//! every check in the operation.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Provides the current unix time in seconds.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> u64;
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    current_time: RwLock<u64>,
}

impl ManualClock {
    /// Create a clock frozen at `time`.
    pub fn new(time: u64) -> Self {
        Self {
            current_time: RwLock::new(time),
        }
    }

    /// Set the current time.
    pub fn set_time(&self, time: u64) {
        *self.current_time.write() = time;
    }

    /// Advance the current time.
    pub fn advance_time(&self, secs: u64) {
        let mut now = self.current_time.write();
        *now = now.saturating_add(secs);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        *self.current_time.read()
    }
}
