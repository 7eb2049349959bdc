//! Queueing Network Simulator Core - Rust Engine
//!
//! Discrete-event simulation of independent finite-buffer, single-channel
//! servers fed by a shared, randomly routed Poisson arrival stream.
//!
//! # Architecture
//!
//! - **core**: Simulation clock and horizon
//! - **models**: Domain types (Event, Server, State, trace log)
//! - **scheduler**: Min-priority queue of pending events
//! - **arrivals**: Routed Poisson arrival stream
//! - **orchestrator**: Configuration, main loop, results
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. A waiting line never exceeds its configured capacity
//! 2. All randomness is deterministic (seeded RNG, passed explicitly)
//! 3. The clock never moves backwards
//! 4. Every generated arrival is accounted for (pending, tossed, waiting,
//!    in service or processed)

// Module declarations
pub mod arrivals;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;
pub mod scheduler;

// Re-exports for convenience
pub use arrivals::ArrivalGenerator;
pub use crate::core::time::{SimClock, TimeError};
pub use models::{
    event::{Arrival, Event, EventKind, ServiceCompletion},
    server::{Server, ServerError},
    state::{AccountingReport, ServerStats, SimulationState},
    trace::{EventLog, TraceEvent},
};
pub use orchestrator::{
    ArrivalGeneration, ServerSummary, SimulationError, SimulationSummary, Simulator,
    SimulatorConfig, StepOutcome,
};
pub use rng::{RandomSource, RngManager};
pub use scheduler::{EventScheduler, SchedulerError};
