//! Simulation events
//!
//! An [`Event`] is a timestamped unit of work bound to one server. There are
//! exactly two kinds:
//! - **Arrival**: a job reaches a server (pre-generated from the Poisson stream)
//! - **ServiceCompletion**: a server finishes the job it was serving
//!
//! Events are totally ordered by `(time, kind, sequence)` inside the
//! scheduler; see [`crate::scheduler`]. This module only carries the data
//! and the kind rank used for tie-breaking.
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::models::{Arrival, Event, EventKind};
//!
//! let event = Event::Arrival(Arrival { time: 1.5, server: 0 });
//! assert_eq!(event.time(), 1.5);
//! assert_eq!(event.kind(), EventKind::Arrival);
//! ```

use serde::{Deserialize, Serialize};

/// A job arriving at a server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    /// Arrival instant
    pub time: f64,
    /// Target server index
    pub server: usize,
}

/// A server finishing one job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceCompletion {
    /// Completion instant (service start + duration)
    pub time: f64,
    /// Server that served the job
    pub server: usize,
    /// When the served job originally arrived
    pub arrival_time: f64,
    /// Length of the service period
    pub service_duration: f64,
}

impl ServiceCompletion {
    /// Instant service began
    pub fn service_start(&self) -> f64 {
        self.time - self.service_duration
    }

    /// Time the job spent in the waiting line before service began
    ///
    /// Floating-point rounding in `time - duration` can leave a negative
    /// residue of a few ulps for jobs served on arrival; that is clamped to 0.
    pub fn wait_time(&self) -> f64 {
        (self.time - self.service_duration - self.arrival_time).max(0.0)
    }
}

/// Discriminant of an [`Event`], ordered by tie-break priority
///
/// At equal timestamps an `Arrival` is dispatched before a
/// `ServiceCompletion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Arrival,
    ServiceCompletion,
}

impl EventKind {
    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Arrival => "Arrival",
            EventKind::ServiceCompletion => "ServiceCompletion",
        }
    }
}

/// Scheduled simulation event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Arrival(Arrival),
    ServiceCompletion(ServiceCompletion),
}

impl Event {
    /// Timestamp at which the event fires
    pub fn time(&self) -> f64 {
        match self {
            Event::Arrival(a) => a.time,
            Event::ServiceCompletion(c) => c.time,
        }
    }

    /// Server the event targets
    pub fn server(&self) -> usize {
        match self {
            Event::Arrival(a) => a.server,
            Event::ServiceCompletion(c) => c.server,
        }
    }

    /// Kind of event
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Arrival(_) => EventKind::Arrival,
            Event::ServiceCompletion(_) => EventKind::ServiceCompletion,
        }
    }
}

impl From<Arrival> for Event {
    fn from(arrival: Arrival) -> Self {
        Event::Arrival(arrival)
    }
}

impl From<ServiceCompletion> for Event {
    fn from(completion: ServiceCompletion) -> Self {
        Event::ServiceCompletion(completion)
    }
}
