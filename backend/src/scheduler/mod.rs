//! Event scheduler
//!
//! Min-priority queue over pending [`Event`]s. `push` and `pop_min` are
//! O(log n) on a `BinaryHeap`.
//!
//! # Ordering
//!
//! Events are dispatched by `(time, kind, sequence)`:
//! 1. Earlier `time` first (compared with `f64::total_cmp`)
//! 2. At equal time, `Arrival` before `ServiceCompletion`
//! 3. Then insertion order (a monotonically increasing sequence number)
//!
//! The order is total and deterministic, so identical push sequences always
//! produce identical pop sequences. Cancellation is not supported: an event
//! leaves the queue only through `pop_min`.

use crate::models::event::{Event, EventKind};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Errors raised by the scheduler
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Event scheduler is empty")]
    Empty,

    #[error("Event time must be finite, got {0}")]
    NonFiniteTime(f64),
}

/// Heap entry: an event plus its insertion sequence
#[derive(Debug, Clone)]
struct ScheduledEvent {
    event: Event,
    kind: EventKind,
    sequence: u64,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on every key for min-heap behavior in BinaryHeap
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then_with(|| other.kind.cmp(&self.kind))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Pending-event queue
///
/// # Example
/// ```
/// use queue_simulator_core_rs::models::{Arrival, Event};
/// use queue_simulator_core_rs::EventScheduler;
///
/// let mut scheduler = EventScheduler::new();
/// scheduler.push(Event::Arrival(Arrival { time: 2.0, server: 0 })).unwrap();
/// scheduler.push(Event::Arrival(Arrival { time: 1.0, server: 1 })).unwrap();
///
/// assert_eq!(scheduler.pop_min().unwrap().time(), 1.0);
/// assert_eq!(scheduler.pop_min().unwrap().time(), 2.0);
/// assert!(scheduler.peek_is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventScheduler {
    heap: BinaryHeap<ScheduledEvent>,
    next_sequence: u64,
}

impl EventScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scheduler with room for `capacity` events
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Insert an event
    ///
    /// Rejects NaN and infinite timestamps, which have no place in the
    /// dispatch order.
    pub fn push(&mut self, event: Event) -> Result<(), SchedulerError> {
        let time = event.time();
        if !time.is_finite() {
            return Err(SchedulerError::NonFiniteTime(time));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEvent {
            kind: event.kind(),
            event,
            sequence,
        });
        Ok(())
    }

    /// Remove and return the earliest event
    pub fn pop_min(&mut self) -> Result<Event, SchedulerError> {
        self.heap
            .pop()
            .map(|entry| entry.event)
            .ok_or(SchedulerError::Empty)
    }

    /// Earliest event without removing it
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|entry| &entry.event)
    }

    /// Whether no events remain
    pub fn peek_is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Same as `peek_is_empty`
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Count pending events of one kind
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.heap.iter().filter(|entry| entry.kind == kind).count()
    }
}
