//! Error types for the bounded buffer system.
//!
//! - [`ConfigError`]: rejected startup parameters.
//! - [`AllocationFailure`]: buffer storage could not be reserved.
//! - [`Interrupted`]: a blocking wait was cut short by a stop request.
//! - [`StartError`]: everything `start()` can fail with.
//! - [`ShutdownError`]: one or more threads did not join cleanly.
//!
//! Each type exposes `as_label` for stable snake_case log fields.

use crate::MPMC::supervisor::ShutdownReport;
use thiserror::Error;

/// Invalid startup parameters. The system never reaches the running state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("buffer capacity must be greater than zero")]
    ZeroCapacity,

    #[error("buffer capacity must not be negative (got {0})")]
    NegativeCapacity(i64),

    #[error("producer count must not be negative (got {0})")]
    NegativeProducers(i64),

    #[error("consumer count must not be negative (got {0})")]
    NegativeConsumers(i64),

    #[error("operation delay must not be negative (got {0} ms)")]
    NegativeDelay(i64),
}

impl ConfigError {
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "config_zero_capacity",
            ConfigError::NegativeCapacity(_) => "config_negative_capacity",
            ConfigError::NegativeProducers(_) => "config_negative_producers",
            ConfigError::NegativeConsumers(_) => "config_negative_consumers",
            ConfigError::NegativeDelay(_) => "config_negative_delay",
        }
    }
}

/// Storage for the buffer slots could not be reserved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to reserve storage for {capacity} buffer slots")]
pub struct AllocationFailure {
    pub capacity: usize,
}

/// A blocking wait returned because the waiting worker was asked to stop,
/// not because the resource became available.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("wait interrupted by stop request")]
pub struct Interrupted;

/// Failure surfaced by [`crate::start`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Allocation(#[from] AllocationFailure),

    /// The OS refused to create a worker thread. Threads spawned before the
    /// failure have already been shut down.
    #[error("failed to spawn thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl StartError {
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::Config(e) => e.as_label(),
            StartError::Allocation(_) => "start_allocation_failure",
            StartError::Spawn { .. } => "start_spawn_failed",
        }
    }
}

/// Failure surfaced by [`crate::stop`].
///
/// Shutdown is best-effort: every remaining thread is still joined and the
/// buffer is still drained before this is returned.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShutdownError {
    #[error("{} thread(s) failed to join cleanly: {failed:?}", .failed.len())]
    Join {
        /// Names of the threads that panicked.
        failed: Vec<String>,
        /// What the rest of the shutdown observed.
        report: ShutdownReport,
    },
}

impl ShutdownError {
    pub fn as_label(&self) -> &'static str {
        match self {
            ShutdownError::Join { .. } => "shutdown_join_failed",
        }
    }

    /// The report gathered while shutting down the threads that did stop.
    pub fn report(&self) -> &ShutdownReport {
        match self {
            ShutdownError::Join { report, .. } => report,
        }
    }
}
