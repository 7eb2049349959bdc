//! Orchestrator - main simulation loop
//!
//! Owns the configuration, the event loop and result aggregation.
//!
//! See `engine.rs` for full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{
    ArrivalGeneration, ServerSummary, SimulationError, SimulationSummary, Simulator,
    SimulatorConfig, StepOutcome, ROUTING_SUM_TOLERANCE,
};
