//! Tests for the simulation clock

use queue_simulator_core_rs::{SimClock, TimeError};

#[test]
fn test_clock_starts_at_zero() {
    let clock = SimClock::new(100.0);
    assert_eq!(clock.current_time(), 0.0);
    assert_eq!(clock.horizon(), 100.0);
    assert!(!clock.is_past_horizon());
}

#[test]
fn test_advance_allows_equal_time() {
    let mut clock = SimClock::new(10.0);
    clock.advance_to(3.0).unwrap();
    clock.advance_to(3.0).unwrap();
    assert_eq!(clock.current_time(), 3.0);
}

#[test]
fn test_advance_rejects_backwards() {
    let mut clock = SimClock::new(10.0);
    clock.advance_to(5.0).unwrap();

    let err = clock.advance_to(4.0).unwrap_err();
    assert_eq!(
        err,
        TimeError::Backwards {
            current: 5.0,
            requested: 4.0
        }
    );
    // Rejected move leaves the clock untouched
    assert_eq!(clock.current_time(), 5.0);
}

#[test]
fn test_horizon_reached_exactly() {
    let mut clock = SimClock::new(10.0);
    clock.advance_to(9.999).unwrap();
    assert!(!clock.is_past_horizon());

    clock.advance_to(10.0).unwrap();
    assert!(clock.is_past_horizon());
}

#[test]
fn test_clock_may_run_past_horizon() {
    let mut clock = SimClock::new(10.0);
    clock.advance_to(42.0).unwrap();
    assert!(clock.is_past_horizon());
    assert_eq!(clock.current_time(), 42.0);
}

#[test]
#[should_panic(expected = "horizon must be positive")]
fn test_zero_horizon_panics() {
    SimClock::new(0.0);
}
