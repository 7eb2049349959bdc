//! Server model
//!
//! A single-channel service station with a bounded FIFO waiting line.
//! Each server has:
//! - A busy/idle flag for its one service channel
//! - A waiting line holding at most `buffer_capacity` arrivals
//!
//! The server is a pure state container: it draws no random numbers and
//! schedules nothing. Admission and completion policy live in the
//! simulator.
//!
//! # Invariants
//!
//! 1. `waiting_len() <= buffer_capacity()` at all times
//! 2. An idle server has an empty waiting line (maintained by the
//!    completion handler, which pulls the next job before going idle)

use crate::models::event::Arrival;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors that can occur during server queue operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServerError {
    #[error("Waiting line of server {server} is empty")]
    EmptyQueue { server: usize },

    #[error("Waiting line of server {server} is full (capacity {capacity})")]
    QueueFull { server: usize, capacity: usize },
}

/// Single-channel service station
///
/// # Example
/// ```
/// use queue_simulator_core_rs::models::{Arrival, Server};
///
/// let mut server = Server::new(0, 2);
/// assert!(!server.is_busy());
///
/// server.set_busy();
/// server.enqueue(Arrival { time: 1.0, server: 0 }).unwrap();
/// assert_eq!(server.waiting_len(), 1);
///
/// let next = server.dequeue().unwrap();
/// assert_eq!(next.time, 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Position of this server in the simulator's server list
    index: usize,

    /// Maximum number of arrivals that may wait (excludes the one in service)
    buffer_capacity: usize,

    /// Arrivals waiting for the channel, oldest first
    waiting_queue: VecDeque<Arrival>,

    /// Whether the service channel is occupied
    busy: bool,
}

impl Server {
    /// Create an idle server with an empty waiting line
    pub fn new(index: usize, buffer_capacity: usize) -> Self {
        Self {
            index,
            buffer_capacity,
            waiting_queue: VecDeque::with_capacity(buffer_capacity.min(1024)),
            busy: false,
        }
    }

    /// Server index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Configured waiting-line capacity
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Whether the service channel is occupied
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the waiting line has reached capacity
    ///
    /// A server with capacity 0 is always full.
    pub fn is_full(&self) -> bool {
        self.waiting_queue.len() >= self.buffer_capacity
    }

    /// Number of arrivals currently waiting
    pub fn waiting_len(&self) -> usize {
        self.waiting_queue.len()
    }

    /// Whether anyone is waiting
    pub fn has_waiting(&self) -> bool {
        !self.waiting_queue.is_empty()
    }

    /// Arrivals waiting, oldest first
    pub fn waiting(&self) -> impl Iterator<Item = &Arrival> {
        self.waiting_queue.iter()
    }

    /// Append an arrival to the tail of the waiting line
    ///
    /// Callers check `is_full()` first; a full line is reported rather
    /// than overrun.
    pub fn enqueue(&mut self, arrival: Arrival) -> Result<(), ServerError> {
        if self.is_full() {
            return Err(ServerError::QueueFull {
                server: self.index,
                capacity: self.buffer_capacity,
            });
        }
        self.waiting_queue.push_back(arrival);
        Ok(())
    }

    /// Remove and return the head of the waiting line
    pub fn dequeue(&mut self) -> Result<Arrival, ServerError> {
        self.waiting_queue
            .pop_front()
            .ok_or(ServerError::EmptyQueue { server: self.index })
    }

    /// Mark the service channel occupied
    pub fn set_busy(&mut self) {
        self.busy = true;
    }

    /// Mark the service channel free
    pub fn set_idle(&mut self) {
        self.busy = false;
    }
}
