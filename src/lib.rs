//! Bounded multi-producer/multi-consumer buffer driven by two counting
//! semaphores and a mutex, run by a fixed pool of OS threads.
//!
//! ```no_run
//! use dmxp_bounded::SystemBuilder;
//! use std::time::Duration;
//!
//! let system = SystemBuilder::new()
//!     .with_capacity(3)
//!     .with_producers(2)
//!     .with_consumers(1)
//!     .start()?;
//!
//! std::thread::sleep(Duration::from_millis(100));
//! let report = dmxp_bounded::stop(system)?;
//! assert_eq!(report.stats.produced, report.stats.consumed + report.drained as u64);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Module naming follows project convention (MPMC = Multi-Producer Multi-Consumer)
#[allow(non_snake_case)]
pub mod MPMC;

#[allow(non_snake_case)]
pub mod Core {
    pub mod semaphore;
    pub mod stop;
    pub use semaphore::SlotSignal; // re-export for stable path
    pub use stop::StopToken;
}

#[allow(non_snake_case)]
mod Debug {
    pub mod StructDebug;
}

pub mod error;

pub use error::{AllocationFailure, ConfigError, Interrupted, ShutdownError, StartError};
pub use MPMC::Structs::{Item, StatsSnapshot};
pub use MPMC::{Config, Discard, ItemSink, ShutdownReport, Supervisor, SystemBuilder};

/// Validate `config`, allocate the buffer and spawn the worker pool.
pub fn start(config: Config) -> Result<Supervisor, StartError> {
    Supervisor::start(config)
}

/// Stop every worker, drain the buffer and free all resources.
/// Blocks until every thread has exited.
pub fn stop(supervisor: Supervisor) -> Result<ShutdownReport, ShutdownError> {
    supervisor.stop()
}
