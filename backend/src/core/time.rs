//! Time management for the simulation
//!
//! The simulation operates in continuous time: the clock jumps straight to
//! the timestamp of each dispatched event. This module owns the clock and
//! the horizon and guarantees the clock never runs backwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by clock movement
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeError {
    #[error("Clock cannot move backwards: current {current}, requested {requested}")]
    Backwards { current: f64, requested: f64 },
}

/// Simulation clock bounded by a horizon
///
/// # Example
/// ```
/// use queue_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new(10.0);
/// assert_eq!(clock.current_time(), 0.0);
///
/// clock.advance_to(4.5).unwrap();
/// assert_eq!(clock.current_time(), 4.5);
/// assert!(!clock.is_past_horizon());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Timestamp of the most recently dispatched event
    current_time: f64,
    /// Time at which the run is scheduled to stop
    horizon: f64,
}

impl SimClock {
    /// Create a clock at time zero
    ///
    /// # Panics
    /// Panics if `horizon` is not a positive finite number. Configuration
    /// validation rejects such horizons before a clock is ever built.
    pub fn new(horizon: f64) -> Self {
        assert!(
            horizon.is_finite() && horizon > 0.0,
            "horizon must be positive and finite"
        );
        Self {
            current_time: 0.0,
            horizon,
        }
    }

    /// Move the clock to `time`
    ///
    /// Equal timestamps are allowed; earlier ones are rejected.
    pub fn advance_to(&mut self, time: f64) -> Result<(), TimeError> {
        if time < self.current_time {
            return Err(TimeError::Backwards {
                current: self.current_time,
                requested: time,
            });
        }
        self.current_time = time;
        Ok(())
    }

    /// Current simulation time
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Configured horizon
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// True once the clock has reached or passed the horizon
    ///
    /// # Example
    /// ```
    /// use queue_simulator_core_rs::SimClock;
    ///
    /// let mut clock = SimClock::new(5.0);
    /// clock.advance_to(5.0).unwrap();
    /// assert!(clock.is_past_horizon());
    /// ```
    pub fn is_past_horizon(&self) -> bool {
        self.current_time >= self.horizon
    }
}
