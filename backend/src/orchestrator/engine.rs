//! Simulator Engine
//!
//! Discrete-event loop for a network of independent finite-buffer,
//! single-channel servers fed by one routed Poisson stream.
//!
//! # Architecture
//!
//! ```text
//! initialize():
//!   build idle servers
//!   seed scheduler with arrivals (whole timeline, or only the first when lazy)
//!
//! while scheduler non-empty AND current_time < horizon:
//!   1. Pop earliest event (time, then Arrival before ServiceCompletion, then FIFO)
//!   2. Advance clock to its time
//!   3. Dispatch:
//!      Arrival          → start service | join waiting line | toss
//!      ServiceCompletion → record stats, then pull next waiting job | go idle
//! ```
//!
//! The horizon is checked before popping, so the event that carries the
//! clock past the horizon is still fully processed; the loop halts on the
//! following check and any later events stay in the scheduler.
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::single_server(1_000.0, 1.0, 1, 2.0);
//! let mut simulator = Simulator::new(config).unwrap();
//! let summary = simulator.run().unwrap();
//!
//! assert!(summary.processed_count > 0);
//! assert!(summary.mean_wait_time >= 0.0);
//! ```

use crate::arrivals::ArrivalGenerator;
use crate::core::time::TimeError;
use crate::models::event::{Arrival, Event, EventKind, ServiceCompletion};
use crate::models::server::{Server, ServerError};
use crate::models::state::SimulationState;
use crate::models::trace::{EventLog, TraceEvent};
use crate::rng::{RandomSource, RngManager};
use crate::scheduler::{EventScheduler, SchedulerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Absolute tolerance when checking that routing probabilities sum to 1
pub const ROUTING_SUM_TOLERANCE: f64 = 1e-6;

fn default_rng_seed() -> u64 {
    12345
}

/// Exponential rate whose largest possible sample is finite
///
/// `RandomSource::exponential` draws `-ln(1 - u) / rate` with `1 - u >= 2^-53`,
/// so no sample exceeds `53 ln 2 / rate`.
fn is_usable_rate(rate: f64) -> bool {
    let max_draw = f64::from(f64::MANTISSA_DIGITS) * std::f64::consts::LN_2;
    rate.is_finite() && rate > 0.0 && (max_draw / rate).is_finite()
}

// ============================================================================
// Configuration Types
// ============================================================================

/// How the external arrival stream is materialised
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalGeneration {
    /// Generate the whole timeline during `initialize()`
    #[default]
    Eager,

    /// Keep one pending arrival; generate the next when it is dispatched
    Lazy,
}

/// Complete simulator configuration
///
/// Immutable for the duration of a run.
///
/// # Fields
///
/// * `horizon` - Simulated stop time
/// * `server_count` - Number of servers N
/// * `routing_probabilities` - N probabilities summing to 1
/// * `arrival_rate` - Poisson rate λ of the shared arrival stream
/// * `buffer_capacities` - N waiting-line capacities
/// * `service_rates` - N exponential service rates μ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Time at which the run is scheduled to stop
    pub horizon: f64,

    /// Number of servers
    pub server_count: usize,

    /// Probability that an arrival is routed to each server
    pub routing_probabilities: Vec<f64>,

    /// Rate of the Poisson arrival stream
    pub arrival_rate: f64,

    /// Waiting-line capacity per server (0 = no waiting line)
    pub buffer_capacities: Vec<usize>,

    /// Exponential service rate per server
    pub service_rates: Vec<f64>,

    /// RNG seed for deterministic simulation
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    /// Eager or lazy arrival generation
    #[serde(default)]
    pub arrival_generation: ArrivalGeneration,

    /// Record a trace event for every dispatch decision
    #[serde(default)]
    pub record_events: bool,
}

impl SimulatorConfig {
    /// One server receiving every arrival
    pub fn single_server(
        horizon: f64,
        arrival_rate: f64,
        buffer_capacity: usize,
        service_rate: f64,
    ) -> Self {
        Self {
            horizon,
            server_count: 1,
            routing_probabilities: vec![1.0],
            arrival_rate,
            buffer_capacities: vec![buffer_capacity],
            service_rates: vec![service_rate],
            rng_seed: default_rng_seed(),
            arrival_generation: ArrivalGeneration::Eager,
            record_events: false,
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: SimulatorConfig =
            serde_json::from_str(json).map_err(|e| SimulationError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::ConfigParse(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Reject malformed inputs before any simulation work
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "horizon must be positive and finite, got {}",
                self.horizon
            )));
        }

        if self.server_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "server_count must be > 0".to_string(),
            ));
        }

        if !is_usable_rate(self.arrival_rate) {
            return Err(SimulationError::InvalidConfig(format!(
                "arrival_rate must be positive and yield finite gaps, got {}",
                self.arrival_rate
            )));
        }

        let lengths = [
            ("routing_probabilities", self.routing_probabilities.len()),
            ("buffer_capacities", self.buffer_capacities.len()),
            ("service_rates", self.service_rates.len()),
        ];
        for (name, len) in lengths {
            if len != self.server_count {
                return Err(SimulationError::InvalidConfig(format!(
                    "{} has {} entries, expected server_count = {}",
                    name, len, self.server_count
                )));
            }
        }

        for (index, p) in self.routing_probabilities.iter().enumerate() {
            if !(p.is_finite() && *p >= 0.0) {
                return Err(SimulationError::InvalidConfig(format!(
                    "routing probability for server {} must be finite and >= 0, got {}",
                    index, p
                )));
            }
        }

        let total: f64 = self.routing_probabilities.iter().sum();
        if (total - 1.0).abs() > ROUTING_SUM_TOLERANCE {
            return Err(SimulationError::InvalidConfig(format!(
                "routing probabilities must sum to 1, got {}",
                total
            )));
        }

        for (index, rate) in self.service_rates.iter().enumerate() {
            if !is_usable_rate(*rate) {
                return Err(SimulationError::InvalidConfig(format!(
                    "service rate for server {} must be positive and yield finite draws, got {}",
                    index, rate
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Errors and Results
// ============================================================================

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration could not be read or parsed
    #[error("Failed to load config: {0}")]
    ConfigParse(String),

    /// `initialize()` called twice
    #[error("Simulator is already initialized")]
    AlreadyInitialized,

    /// An event referenced a server that does not exist
    #[error("Server not found: {0}")]
    ServerNotFound(usize),

    /// Mean statistics requested before any job completed
    #[error("No service completions recorded; mean statistics are undefined")]
    NoCompletedService,

    /// Scheduler invariant violated (popping an empty scheduler, bad timestamp)
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Waiting-line invariant violated
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Clock invariant violated
    #[error("Clock error: {0}")]
    Clock(#[from] TimeError),
}

impl SimulationError {
    /// True for the fatal empty-queue invariant violations
    pub fn is_empty_queue(&self) -> bool {
        matches!(
            self,
            SimulationError::Scheduler(SchedulerError::Empty)
                | SimulationError::Server(ServerError::EmptyQueue { .. })
        )
    }
}

/// Result of a single loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An event of this kind was popped and processed
    Dispatched(EventKind),

    /// The loop has stopped; further steps do nothing
    Halted,
}

/// Final statistics of one server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSummary {
    pub index: usize,
    pub processed_count: u64,
    pub tossed_count: u64,
    pub mean_wait_time: Option<f64>,
    pub mean_service_time: Option<f64>,
    pub peak_queue_len: usize,
    pub waiting_at_halt: usize,
    pub busy_at_halt: bool,
}

/// Final statistics of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Jobs that completed service
    pub processed_count: u64,

    /// Arrivals dropped at a full waiting line
    pub tossed_count: u64,

    /// Clock value when the loop halted
    pub final_clock_time: f64,

    /// Mean time spent in a waiting line per processed job
    pub mean_wait_time: f64,

    /// Mean service duration per processed job
    pub mean_service_time: f64,

    /// Mean wait plus mean service
    pub mean_sojourn_time: f64,

    /// Arrivals pushed into the scheduler
    pub arrivals_generated: u64,

    /// Events left in the scheduler at halt
    pub pending_events: usize,

    /// Per-server breakdown
    pub servers: Vec<ServerSummary>,
}

impl fmt::Display for SimulationSummary {
    /// `processed tossed final_clock mean_wait mean_service`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.processed_count,
            self.tossed_count,
            self.final_clock_time,
            self.mean_wait_time,
            self.mean_service_time
        )
    }
}

// ============================================================================
// Simulator
// ============================================================================

/// Main simulator owning all state for one run
///
/// # Determinism
///
/// All randomness flows through two streams derived from one generator:
/// one for the arrival timeline, one for service durations.
/// Same seed + same config = identical results.
pub struct Simulator<R = RngManager> {
    /// Run parameters
    config: SimulatorConfig,

    /// Clock, servers, scheduler and counters
    state: SimulationState,

    /// Stream for service durations
    service_rng: R,

    /// External arrival stream
    arrivals: ArrivalGenerator<R>,

    /// Trace of dispatch decisions (None unless `record_events`)
    event_log: Option<EventLog>,

    initialized: bool,
    halted: bool,
}

impl Simulator<RngManager> {
    /// Create a simulator seeded from `config.rng_seed`
    ///
    /// # Returns
    ///
    /// * `Ok(Simulator)` - Validated, not yet initialized
    /// * `Err(SimulationError::InvalidConfig)` - Configuration validation failed
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Simulator<R> {
    /// Create a simulator drawing from an explicit generator
    ///
    /// The arrival stream is forked from `rng` first; `rng` then supplies
    /// service durations.
    pub fn with_rng(config: SimulatorConfig, mut rng: R) -> Result<Self, SimulationError> {
        let arrival_rng = rng.fork();
        Self::with_sources(config, arrival_rng, rng)
    }

    /// Create a simulator with separate arrival and service streams
    pub fn with_sources(
        config: SimulatorConfig,
        arrival_rng: R,
        service_rng: R,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let state = SimulationState::new(config.horizon, &config.buffer_capacities);
        let arrivals = ArrivalGenerator::new(
            arrival_rng,
            config.arrival_rate,
            config.routing_probabilities.clone(),
            config.horizon,
        );
        let event_log = config.record_events.then(EventLog::new);

        Ok(Self {
            config,
            state,
            service_rng,
            arrivals,
            event_log,
            initialized: false,
            halted: false,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Run parameters
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Simulation state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// All servers
    pub fn servers(&self) -> &[Server] {
        &self.state.servers
    }

    /// Current simulation time
    pub fn current_time(&self) -> f64 {
        self.state.current_time()
    }

    /// Events still in the scheduler
    pub fn pending_events(&self) -> usize {
        self.state.scheduler.len()
    }

    /// Arrivals pushed into the scheduler so far
    pub fn arrivals_generated(&self) -> u64 {
        self.state.arrivals_generated
    }

    /// Trace log, when `record_events` is set
    pub fn event_log(&self) -> Option<&EventLog> {
        self.event_log.as_ref()
    }

    /// Whether `initialize()` has run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether the main loop has stopped
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Build idle servers and seed the scheduler with arrivals
    ///
    /// Eager generation pushes the whole timeline; lazy generation pushes
    /// only the first arrival.
    pub fn initialize(&mut self) -> Result<(), SimulationError> {
        if self.initialized {
            return Err(SimulationError::AlreadyInitialized);
        }

        self.state = SimulationState::new(self.config.horizon, &self.config.buffer_capacities);

        match self.config.arrival_generation {
            ArrivalGeneration::Eager => {
                let timeline: Vec<Arrival> = self.arrivals.by_ref().collect();
                self.state.scheduler = EventScheduler::with_capacity(
                    timeline.len() + self.config.server_count,
                );
                for arrival in timeline {
                    self.push_arrival(arrival)?;
                }
            }
            ArrivalGeneration::Lazy => self.schedule_next_arrival()?,
        }

        self.initialized = true;
        debug!(
            servers = self.config.server_count,
            arrivals = self.state.arrivals_generated,
            mode = ?self.config.arrival_generation,
            horizon = self.config.horizon,
            "simulation initialized"
        );
        Ok(())
    }

    /// Execute one iteration of the main loop
    ///
    /// Initializes on first use. Returns `Halted` once the scheduler is
    /// empty or the clock has reached the horizon, and on every call after.
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        if !self.initialized {
            self.initialize()?;
        }

        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        if self.state.scheduler.peek_is_empty() || self.state.clock.is_past_horizon() {
            self.halt();
            return Ok(StepOutcome::Halted);
        }

        let event = self.state.scheduler.pop_min()?;
        self.state.clock.advance_to(event.time())?;

        let kind = event.kind();
        trace!(
            time = event.time(),
            server = event.server(),
            kind = kind.as_str(),
            "dispatch"
        );

        match event {
            Event::Arrival(arrival) => {
                if self.config.arrival_generation == ArrivalGeneration::Lazy {
                    self.schedule_next_arrival()?;
                }
                self.handle_arrival(arrival)?;
            }
            Event::ServiceCompletion(completion) => self.handle_completion(completion)?,
        }

        Ok(StepOutcome::Dispatched(kind))
    }

    /// Run the main loop to completion and return the summary
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        while let StepOutcome::Dispatched(_) = self.step()? {}
        self.summary()
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Mean time in system per processed job
    pub fn mean_sojourn_time(&self) -> Result<f64, SimulationError> {
        if self.state.processed_count == 0 {
            return Err(SimulationError::NoCompletedService);
        }
        Ok((self.state.cumulative_wait_time + self.state.cumulative_service_time)
            / self.state.processed_count as f64)
    }

    /// Aggregate and per-server statistics
    ///
    /// Fails with `NoCompletedService` while no job has completed.
    pub fn summary(&self) -> Result<SimulationSummary, SimulationError> {
        let processed = self.state.processed_count;
        if processed == 0 {
            return Err(SimulationError::NoCompletedService);
        }

        let servers = self
            .state
            .servers
            .iter()
            .zip(&self.state.server_stats)
            .map(|(server, stats)| ServerSummary {
                index: server.index(),
                processed_count: stats.processed_count,
                tossed_count: stats.tossed_count,
                mean_wait_time: stats.mean_wait_time(),
                mean_service_time: stats.mean_service_time(),
                peak_queue_len: stats.peak_queue_len,
                waiting_at_halt: server.waiting_len(),
                busy_at_halt: server.is_busy(),
            })
            .collect();

        let mean_wait_time = self.state.cumulative_wait_time / processed as f64;
        let mean_service_time = self.state.cumulative_service_time / processed as f64;

        Ok(SimulationSummary {
            processed_count: processed,
            tossed_count: self.state.tossed_count,
            final_clock_time: self.state.current_time(),
            mean_wait_time,
            mean_service_time,
            mean_sojourn_time: mean_wait_time + mean_service_time,
            arrivals_generated: self.state.arrivals_generated,
            pending_events: self.state.scheduler.len(),
            servers,
        })
    }

    // ========================================================================
    // Event Handling
    // ========================================================================

    /// Admission policy: serve, queue, or toss
    fn handle_arrival(&mut self, arrival: Arrival) -> Result<(), SimulationError> {
        let index = arrival.server;
        let rate = self.service_rate(index)?;
        let server = self
            .state
            .servers
            .get_mut(index)
            .ok_or(SimulationError::ServerNotFound(index))?;

        if !server.is_busy() {
            server.set_busy();
            return self.start_service(index, arrival.time, arrival.time, rate);
        }

        if server.is_full() {
            self.state.record_toss(index);
            debug!(time = arrival.time, server = index, "arrival tossed: waiting line full");
            self.record(TraceEvent::Tossed {
                time: arrival.time,
                server: index,
            });
            return Ok(());
        }

        server.enqueue(arrival)?;
        let queue_len = server.waiting_len();
        self.state.record_queue_len(index, queue_len);
        self.record(TraceEvent::Queued {
            time: arrival.time,
            server: index,
            queue_len,
        });
        Ok(())
    }

    /// Completion policy: record, then pull the next waiting job or go idle
    fn handle_completion(&mut self, completion: ServiceCompletion) -> Result<(), SimulationError> {
        let index = completion.server;
        let rate = self.service_rate(index)?;
        let wait_time = completion.wait_time();

        self.state
            .record_completion(index, wait_time, completion.service_duration);
        self.record(TraceEvent::ServiceCompleted {
            time: completion.time,
            server: index,
            arrival_time: completion.arrival_time,
            service_duration: completion.service_duration,
            wait_time,
        });

        let server = self
            .state
            .servers
            .get_mut(index)
            .ok_or(SimulationError::ServerNotFound(index))?;

        if server.has_waiting() {
            let next = server.dequeue()?;
            self.start_service(index, completion.time, next.time, rate)
        } else {
            server.set_idle();
            Ok(())
        }
    }

    /// Draw a service duration and schedule the job's completion
    fn start_service(
        &mut self,
        server: usize,
        now: f64,
        arrival_time: f64,
        rate: f64,
    ) -> Result<(), SimulationError> {
        let service_duration = self.service_rng.exponential(rate);
        self.state.scheduler.push(
            ServiceCompletion {
                time: now + service_duration,
                server,
                arrival_time,
                service_duration,
            }
            .into(),
        )?;
        self.record(TraceEvent::ServiceStarted {
            time: now,
            server,
            arrival_time,
            service_duration,
        });
        Ok(())
    }

    fn schedule_next_arrival(&mut self) -> Result<(), SimulationError> {
        if let Some(arrival) = self.arrivals.next() {
            self.push_arrival(arrival)?;
        }
        Ok(())
    }

    fn push_arrival(&mut self, arrival: Arrival) -> Result<(), SimulationError> {
        if arrival.server >= self.state.num_servers() {
            return Err(SimulationError::ServerNotFound(arrival.server));
        }
        self.state.scheduler.push(arrival.into())?;
        self.state.arrivals_generated += 1;
        Ok(())
    }

    fn service_rate(&self, server: usize) -> Result<f64, SimulationError> {
        self.config
            .service_rates
            .get(server)
            .copied()
            .ok_or(SimulationError::ServerNotFound(server))
    }

    fn halt(&mut self) {
        self.halted = true;
        let pending_events = self.state.scheduler.len();
        self.record(TraceEvent::Halted {
            time: self.state.current_time(),
            pending_events,
        });

        if pending_events > 0 {
            debug!(
                pending_events,
                completions = self.state.scheduler.count_of(EventKind::ServiceCompletion),
                "events left unprocessed at halt"
            );
        }
        info!(
            processed = self.state.processed_count,
            tossed = self.state.tossed_count,
            time = self.state.current_time(),
            "simulation halted"
        );
    }

    fn record(&mut self, event: TraceEvent) {
        if let Some(log) = self.event_log.as_mut() {
            log.log(event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
