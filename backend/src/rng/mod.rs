//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the simulator MUST go through this module.
//!
//! The simulator never touches a global generator. It owns a value that
//! implements [`RandomSource`], so tests can substitute a scripted source
//! and real runs can be replayed from a seed.

mod xorshift;

pub use xorshift::RngManager;

/// A stream of uniform draws plus the two distributions the simulator samples.
///
/// Implementors only need `next_f64` and `fork`; the sampling methods have
/// default implementations built on `next_f64`.
pub trait RandomSource {
    /// Uniform draw in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Derive an independent stream from this one.
    ///
    /// Advances `self`, so forking is itself deterministic.
    fn fork(&mut self) -> Self
    where
        Self: Sized;

    /// Sample an exponential variate with the given rate (mean `1 / rate`).
    ///
    /// Inverse-transform sampling on `1 - u`, which lies in `(0, 1]`, so the
    /// result is always finite and non-negative.
    fn exponential(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0, "exponential rate must be positive");
        let u = 1.0 - self.next_f64();
        -u.ln() / rate
    }

    /// Sample an index from a categorical distribution.
    ///
    /// `weights` are expected to sum to 1. If rounding leaves the draw past
    /// the last cumulative bound, the last index with positive weight is
    /// returned. Zero-weight entries are never selected.
    fn categorical(&mut self, weights: &[f64]) -> usize {
        let u = self.next_f64();
        let mut cumulative = 0.0;
        for (index, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if *weight > 0.0 && u < cumulative {
                return index;
            }
        }

        weights
            .iter()
            .rposition(|w| *w > 0.0)
            .unwrap_or(weights.len().saturating_sub(1))
    }
}
