//! Simulation State
//!
//! Represents the complete mutable state of one simulation run.
//! Contains the clock, all servers, the pending-event scheduler and the
//! aggregate counters.
//!
//! # Critical Invariants
//!
//! 1. **Buffer Bound**: every server's waiting line stays within its capacity
//! 2. **Monotone Clock**: `current_time` never decreases
//! 3. **Conservation**: every generated arrival is pending, tossed, waiting,
//!    in service or processed (see [`SimulationState::accounting_check`])
//! 4. **One Completion Per Busy Server**: each busy server has exactly one
//!    pending `ServiceCompletion` in the scheduler

use crate::core::time::SimClock;
use crate::models::event::EventKind;
use crate::models::server::Server;
use crate::scheduler::EventScheduler;
use serde::{Deserialize, Serialize};

/// Per-server counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
    /// Jobs that completed service
    pub processed_count: u64,

    /// Arrivals dropped because the waiting line was full
    pub tossed_count: u64,

    /// Sum of waiting-line times of processed jobs
    pub cumulative_wait_time: f64,

    /// Sum of service durations of processed jobs
    pub cumulative_service_time: f64,

    /// Longest waiting line observed
    pub peak_queue_len: usize,
}

impl ServerStats {
    /// Average wait, or `None` before the first completion
    pub fn mean_wait_time(&self) -> Option<f64> {
        (self.processed_count > 0).then(|| self.cumulative_wait_time / self.processed_count as f64)
    }

    /// Average service duration, or `None` before the first completion
    pub fn mean_service_time(&self) -> Option<f64> {
        (self.processed_count > 0)
            .then(|| self.cumulative_service_time / self.processed_count as f64)
    }
}

/// Breakdown of where every generated arrival ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingReport {
    pub arrivals_generated: u64,
    pub processed: u64,
    pub tossed: u64,
    pub waiting: u64,
    pub in_service: u64,
    pub pending_arrivals: u64,
}

impl AccountingReport {
    /// True when no arrival has gone missing
    pub fn is_balanced(&self) -> bool {
        self.arrivals_generated
            == self.processed + self.tossed + self.waiting + self.in_service + self.pending_arrivals
    }
}

/// Complete simulation state
///
/// # Example
///
/// ```rust
/// use queue_simulator_core_rs::SimulationState;
///
/// let state = SimulationState::new(100.0, &[2, 0]);
/// assert_eq!(state.num_servers(), 2);
/// assert_eq!(state.current_time(), 0.0);
/// assert!(state.scheduler.peek_is_empty());
/// ```
#[derive(Debug)]
pub struct SimulationState {
    /// Simulation clock and horizon
    pub clock: SimClock,

    /// Servers, indexed by position
    pub servers: Vec<Server>,

    /// Pending events
    pub scheduler: EventScheduler,

    /// Jobs that completed service (all servers)
    pub processed_count: u64,

    /// Arrivals dropped (all servers)
    pub tossed_count: u64,

    /// Sum of waiting-line times (all servers)
    pub cumulative_wait_time: f64,

    /// Sum of service durations (all servers)
    pub cumulative_service_time: f64,

    /// Arrivals pushed into the scheduler so far
    pub arrivals_generated: u64,

    /// Per-server breakdown of the aggregate counters
    pub server_stats: Vec<ServerStats>,
}

impl SimulationState {
    /// Create a fresh state with idle servers and an empty scheduler
    ///
    /// # Arguments
    ///
    /// * `horizon` - Time at which the run is scheduled to stop
    /// * `buffer_capacities` - Waiting-line capacity per server
    pub fn new(horizon: f64, buffer_capacities: &[usize]) -> Self {
        let servers = buffer_capacities
            .iter()
            .enumerate()
            .map(|(index, capacity)| Server::new(index, *capacity))
            .collect();

        Self {
            clock: SimClock::new(horizon),
            servers,
            scheduler: EventScheduler::new(),
            processed_count: 0,
            tossed_count: 0,
            cumulative_wait_time: 0.0,
            cumulative_service_time: 0.0,
            arrivals_generated: 0,
            server_stats: vec![ServerStats::default(); buffer_capacities.len()],
        }
    }

    /// Number of servers
    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    /// Current simulation time
    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    /// Record a finished job on `server`
    pub fn record_completion(&mut self, server: usize, wait_time: f64, service_duration: f64) {
        self.processed_count += 1;
        self.cumulative_wait_time += wait_time;
        self.cumulative_service_time += service_duration;

        if let Some(stats) = self.server_stats.get_mut(server) {
            stats.processed_count += 1;
            stats.cumulative_wait_time += wait_time;
            stats.cumulative_service_time += service_duration;
        }
    }

    /// Record a dropped arrival on `server`
    pub fn record_toss(&mut self, server: usize) {
        self.tossed_count += 1;
        if let Some(stats) = self.server_stats.get_mut(server) {
            stats.tossed_count += 1;
        }
    }

    /// Track the longest waiting line seen on `server`
    pub fn record_queue_len(&mut self, server: usize, queue_len: usize) {
        if let Some(stats) = self.server_stats.get_mut(server) {
            stats.peak_queue_len = stats.peak_queue_len.max(queue_len);
        }
    }

    /// Total arrivals currently sitting in waiting lines
    pub fn total_waiting(&self) -> usize {
        self.servers.iter().map(Server::waiting_len).sum()
    }

    /// Number of busy servers
    pub fn busy_servers(&self) -> usize {
        self.servers.iter().filter(|s| s.is_busy()).count()
    }

    /// Account for every generated arrival
    pub fn accounting_check(&self) -> AccountingReport {
        AccountingReport {
            arrivals_generated: self.arrivals_generated,
            processed: self.processed_count,
            tossed: self.tossed_count,
            waiting: self.total_waiting() as u64,
            in_service: self.busy_servers() as u64,
            pending_arrivals: self.scheduler.count_of(EventKind::Arrival) as u64,
        }
    }
}
