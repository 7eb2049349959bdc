//! Event logging for simulation auditing.
//!
//! When `record_events` is enabled the simulator appends one
//! [`TraceEvent`] per decision it takes. The log enables:
//! - Debugging (understand what happened and when)
//! - Auditing (check per-job wait times and queue bounds)
//! - Analysis (extract per-server patterns)
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::models::{EventLog, TraceEvent};
//!
//! let mut log = EventLog::new();
//! log.log(TraceEvent::Tossed { time: 2.0, server: 1 });
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.events_of_type("Tossed").len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// One recorded simulator decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A job entered service (immediately on arrival, or from the waiting line)
    ServiceStarted {
        time: f64,
        server: usize,
        arrival_time: f64,
        service_duration: f64,
    },

    /// An arrival found the server busy and joined the waiting line
    Queued {
        time: f64,
        server: usize,
        queue_len: usize,
    },

    /// An arrival found the server busy and the waiting line full
    Tossed { time: f64, server: usize },

    /// A job finished service
    ServiceCompleted {
        time: f64,
        server: usize,
        arrival_time: f64,
        service_duration: f64,
        wait_time: f64,
    },

    /// The main loop stopped
    Halted { time: f64, pending_events: usize },
}

impl TraceEvent {
    /// Simulation time of the decision
    pub fn time(&self) -> f64 {
        match self {
            TraceEvent::ServiceStarted { time, .. } => *time,
            TraceEvent::Queued { time, .. } => *time,
            TraceEvent::Tossed { time, .. } => *time,
            TraceEvent::ServiceCompleted { time, .. } => *time,
            TraceEvent::Halted { time, .. } => *time,
        }
    }

    /// Server involved, if any
    pub fn server(&self) -> Option<usize> {
        match self {
            TraceEvent::ServiceStarted { server, .. } => Some(*server),
            TraceEvent::Queued { server, .. } => Some(*server),
            TraceEvent::Tossed { server, .. } => Some(*server),
            TraceEvent::ServiceCompleted { server, .. } => Some(*server),
            TraceEvent::Halted { .. } => None,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            TraceEvent::ServiceStarted { .. } => "ServiceStarted",
            TraceEvent::Queued { .. } => "Queued",
            TraceEvent::Tossed { .. } => "Tossed",
            TraceEvent::ServiceCompleted { .. } => "ServiceCompleted",
            TraceEvent::Halted { .. } => "Halted",
        }
    }
}

/// Append-only log of trace events
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<TraceEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&TraceEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific server
    pub fn events_for_server(&self, server: usize) -> Vec<&TraceEvent> {
        self.events
            .iter()
            .filter(|e| e.server() == Some(server))
            .collect()
    }
}
