//! # Clocks
//!
//! Two implementations of [`Clock`] are provided. [`MonotonicClock`] follows the wall clock and is
//! used when running in real time. [`SteppedClock`] only moves when told to, and is used to run
//! faster than real time and in tests.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::Cell, time::Instant};

use auto_if::Clock;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A clock measuring real time since it was created.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

/// A clock which is advanced manually.
#[derive(Debug, Default)]
pub struct SteppedClock {
    now_s: Cell<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_s(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl SteppedClock {
    pub fn new(start_s: f64) -> Self {
        Self {
            now_s: Cell::new(start_s),
        }
    }

    /// Set the current time.
    pub fn set(&self, now_s: f64) {
        self.now_s.set(now_s);
    }

    /// Move the clock forward by `dt_s` seconds.
    pub fn advance(&self, dt_s: f64) {
        self.now_s.set(self.now_s.get() + dt_s);
    }
}

impl Clock for SteppedClock {
    fn now_s(&self) -> f64 {
        self.now_s.get()
    }
}
