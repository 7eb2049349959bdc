//! Domain models for the queueing simulator

pub mod event;
pub mod server;
pub mod state;
pub mod trace;

// Re-exports
pub use event::{Arrival, Event, EventKind, ServiceCompletion};
pub use server::{Server, ServerError};
pub use state::{AccountingReport, ServerStats, SimulationState};
pub use trace::{EventLog, TraceEvent};
