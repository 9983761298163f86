//! Startup and shutdown of the worker pool.
//!
//! ```text
//! start(config):
//!   BoundedBuffer::with_capacity ─► SystemState { buffer, empty_slots = capacity, filled_slots = 0 }
//!   spawn producer-0 .. producer-N   (gate: empty_slots, complement: filled_slots)
//!   spawn consumer-0 .. consumer-M   (gate: filled_slots, complement: empty_slots)
//!
//! stop():
//!   1. consumer-releaser ─► request stop on consumers ─► nudge ─► join consumers ─► stop releaser
//!   2. producer-releaser ─► request stop on producers ─► nudge ─► join producers ─► stop releaser
//!   3. drain up to `capacity` items into the sink
//!   4. drop buffer storage and handles
//! ```
//!
//! Consumers are stopped first. While they shut down the producers keep
//! running and at worst fill the buffer and park on `empty_slots`; the
//! producer releaser then frees them and the drain empties whatever is left.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::builder::Config;
use super::releaser::Releaser;
use super::sink::{Discard, ItemSink};
use super::state::SystemState;
use super::worker::{WorkerHandle, WorkerKind, WorkerStatus};
use crate::error::{ShutdownError, StartError};
use crate::MPMC::Buffer::BoundedBuffer;
use crate::MPMC::Structs::StatsSnapshot;

/// Outcome of a completed shutdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Counters after every worker has been joined.
    pub stats: StatsSnapshot,
    /// Items removed from the buffer by the final drain.
    pub drained: usize,
}

/// Handle to a running system. Owns the shared state and every pool thread.
///
/// Dropping a handle that was never stopped runs the same shutdown as
/// [`Supervisor::stop`] and logs any failure.
pub struct Supervisor {
    config: Config,
    state: Arc<SystemState>,
    producers: Vec<WorkerHandle>,
    consumers: Vec<WorkerHandle>,
    stopped: bool,
}

impl Supervisor {
    /// Start the system, discarding consumed items.
    pub fn start(config: Config) -> Result<Self, StartError> {
        Self::start_with_sink(config, Arc::new(Discard))
    }

    /// Start the system, handing every consumed and drained item to `sink`.
    pub fn start_with_sink(config: Config, sink: Arc<dyn ItemSink>) -> Result<Self, StartError> {
        config.validate()?;
        let buffer = BoundedBuffer::with_capacity(config.capacity)?;
        let state = Arc::new(SystemState::new(buffer, sink));

        info!(
            capacity = config.capacity,
            producers = config.producers,
            consumers = config.consumers,
            delay = ?config.operation_delay,
            "starting bounded buffer"
        );

        let mut supervisor = Self {
            producers: Vec::with_capacity(config.producers),
            consumers: Vec::with_capacity(config.consumers),
            config,
            state,
            stopped: false,
        };

        if let Err(err) = supervisor
            .spawn_pool(WorkerKind::Producer)
            .and_then(|()| supervisor.spawn_pool(WorkerKind::Consumer))
        {
            error!(error = %err, label = err.as_label(), "startup failed; stopping spawned workers");
            if let Err(shutdown_err) = supervisor.shutdown() {
                error!(error = %shutdown_err, "cleanup after failed startup was incomplete");
            }
            return Err(err);
        }

        Ok(supervisor)
    }

    fn spawn_pool(&mut self, kind: WorkerKind) -> Result<(), StartError> {
        let count = match kind {
            WorkerKind::Producer => self.config.producers,
            WorkerKind::Consumer => self.config.consumers,
        };

        for index in 0..count {
            let worker = WorkerHandle::spawn(
                kind,
                index,
                Arc::clone(&self.state),
                self.config.operation_delay,
            )?;
            self.pool_mut(kind).push(worker);
        }
        Ok(())
    }

    fn pool_mut(&mut self, kind: WorkerKind) -> &mut Vec<WorkerHandle> {
        match kind {
            WorkerKind::Producer => &mut self.producers,
            WorkerKind::Consumer => &mut self.consumers,
        }
    }

    /// Stop every worker, drain the buffer and release all resources.
    ///
    /// Blocks until every thread has exited. Threads that panicked are
    /// reported in [`ShutdownError::Join`]; the rest of the shutdown still runs.
    pub fn stop(mut self) -> Result<ShutdownReport, ShutdownError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<ShutdownReport, ShutdownError> {
        self.stopped = true;
        info!("stopping bounded buffer");

        let mut failed = Vec::new();
        self.stop_pool(WorkerKind::Consumer, &mut failed);
        self.stop_pool(WorkerKind::Producer, &mut failed);

        let drained = self.drain();
        let report = ShutdownReport {
            stats: self.stats(),
            drained,
        };

        if failed.is_empty() {
            info!(
                produced = report.stats.produced,
                consumed = report.stats.consumed,
                drained = report.drained,
                "all threads stopped"
            );
            Ok(report)
        } else {
            error!(failed = ?failed, "shutdown finished with failed threads");
            Err(ShutdownError::Join { failed, report })
        }
    }

    fn stop_pool(&mut self, kind: WorkerKind, failed: &mut Vec<String>) {
        let workers = std::mem::take(self.pool_mut(kind));

        let releaser = match Releaser::spawn(kind, Arc::clone(&self.state)) {
            Ok(releaser) => Some(releaser),
            Err(err) => {
                warn!(kind = %kind, error = %err, "could not spawn releaser; waking waiters inline");
                None
            }
        };

        for worker in &workers {
            worker.request_stop();
        }
        match &releaser {
            Some(releaser) => releaser.nudge(),
            None => {
                kind.gate(&self.state).interrupt_waiters();
            }
        }

        for worker in workers {
            if let Err(name) = worker.join() {
                failed.push(name);
            }
        }

        if let Some(releaser) = releaser {
            if let Err(name) = releaser.stop() {
                failed.push(name);
            }
        }
        info!(kind = %kind, "workers stopped");
    }

    /// Remove at most `capacity` leftover items and hand them to the sink.
    fn drain(&self) -> usize {
        let leftovers = {
            let mut buffer = self.state.buffer.lock();
            let capacity = buffer.capacity();
            let leftovers = buffer.drain(capacity);
            buffer.storage = Default::default();
            leftovers
        };

        let drained = leftovers.len();
        for item in leftovers {
            self.state.sink.drained(item);
        }
        drained
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Current number of queued items. Takes the buffer lock.
    pub fn occupancy(&self) -> usize {
        self.state.buffer.lock().occupancy()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.state.stats.snapshot()
    }

    /// Lifecycle state of every pool thread, producers first.
    pub fn worker_states(&self) -> Vec<WorkerStatus> {
        self.producers
            .iter()
            .chain(self.consumers.iter())
            .map(WorkerHandle::status)
            .collect()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }
        if let Err(err) = self.shutdown() {
            error!(error = %err, label = err.as_label(), "shutdown on drop failed");
        }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_supervisor(self, f)
    }
}
