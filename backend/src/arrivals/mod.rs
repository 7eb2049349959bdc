//! Arrival generation module for the external Poisson stream.
//!
//! Arrivals are independent of server dynamics: the generator walks a
//! running clock forward by exponential gaps and routes each instant to a
//! server drawn from the routing distribution.
//!
//! # Key Principles
//!
//! 1. **Determinism**: Same seed + same config → same arrivals
//! 2. **First arrival at time 0**: the stream always opens with an arrival
//!    at clock value 0
//! 3. **One overshoot**: generation stops once the clock reaches the
//!    horizon, but the arrival that crossed it is still emitted
//! 4. **Own stream**: the generator owns its random source, so eager and
//!    lazy use see the identical timeline
//!
//! # Example
//!
//! ```
//! use queue_simulator_core_rs::arrivals::ArrivalGenerator;
//! use queue_simulator_core_rs::rng::RngManager;
//!
//! let generator = ArrivalGenerator::new(RngManager::new(42), 2.0, vec![0.5, 0.5], 10.0);
//! let arrivals: Vec<_> = generator.collect();
//!
//! assert_eq!(arrivals[0].time, 0.0);
//! assert!(arrivals.last().unwrap().time >= 10.0);
//! assert!(arrivals[..arrivals.len() - 1].iter().all(|a| a.time < 10.0));
//! ```

use crate::models::event::Arrival;
use crate::rng::RandomSource;

/// Generator for the routed Poisson arrival stream
///
/// Implements `Iterator`; the iterator is finite because every gap is
/// drawn from an exponential with positive rate.
#[derive(Debug, Clone)]
pub struct ArrivalGenerator<R> {
    /// Random stream used for gaps and routing
    rng: R,

    /// Poisson rate λ of the external stream
    arrival_rate: f64,

    /// Probability of routing an arrival to each server
    routing_probabilities: Vec<f64>,

    /// Generation stops after the first instant at or past this time
    horizon: f64,

    /// Instant of the next arrival to emit
    clock: f64,

    /// Set once the overshooting arrival has been emitted
    exhausted: bool,

    /// Arrivals emitted so far
    generated: u64,
}

impl<R: RandomSource> ArrivalGenerator<R> {
    /// Create a new arrival generator.
    ///
    /// # Arguments
    ///
    /// * `rng` - Random stream dedicated to arrivals
    /// * `arrival_rate` - Poisson rate λ (must be positive)
    /// * `routing_probabilities` - One probability per server
    /// * `horizon` - Simulated stop time
    pub fn new(rng: R, arrival_rate: f64, routing_probabilities: Vec<f64>, horizon: f64) -> Self {
        Self {
            rng,
            arrival_rate,
            routing_probabilities,
            horizon,
            clock: 0.0,
            exhausted: false,
            generated: 0,
        }
    }

    /// Arrivals emitted so far
    pub fn generated(&self) -> u64 {
        self.generated
    }

    /// Whether the overshooting arrival has been emitted
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl<R: RandomSource> Iterator for ArrivalGenerator<R> {
    type Item = Arrival;

    fn next(&mut self) -> Option<Arrival> {
        if self.exhausted {
            return None;
        }

        let time = self.clock;
        let server = self.rng.categorical(&self.routing_probabilities);

        if time >= self.horizon {
            self.exhausted = true;
        } else {
            self.clock += self.rng.exponential(self.arrival_rate);
        }

        self.generated += 1;
        Some(Arrival { time, server })
    }
}
