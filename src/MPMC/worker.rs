// Shared worker machinery: thread spawning, the iteration loop and the
// acquire -> lock -> critical section -> unlock -> release protocol.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::state::SystemState;
use super::{consumer, producer};
use crate::error::{Interrupted, StartError};
use crate::Core::{SlotSignal, StopToken};

/// How long a single lock attempt waits before the stop token is re-checked.
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    Producer,
    Consumer,
}

impl WorkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerKind::Producer => "producer",
            WorkerKind::Consumer => "consumer",
        }
    }

    /// The signal this kind of worker waits on before entering the buffer.
    pub(crate) fn gate<'a>(&self, state: &'a SystemState) -> &'a SlotSignal {
        match self {
            WorkerKind::Producer => &state.empty_slots,
            WorkerKind::Consumer => &state.filled_slots,
        }
    }

    /// The signal this kind of worker releases after leaving the buffer.
    pub(crate) fn complement<'a>(&self, state: &'a SystemState) -> &'a SlotSignal {
        match self {
            WorkerKind::Producer => &state.filled_slots,
            WorkerKind::Consumer => &state.empty_slots,
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    StopRequested,
    Finished,
}

/// Name, kind and lifecycle state of one pool thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerStatus {
    pub name: String,
    pub kind: WorkerKind,
    pub state: WorkerState,
}

/// Supervisor-side handle to a running worker thread.
pub(crate) struct WorkerHandle {
    name: String,
    kind: WorkerKind,
    stop: StopToken,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub(crate) fn spawn(
        kind: WorkerKind,
        index: usize,
        state: Arc<SystemState>,
        delay: Duration,
    ) -> Result<Self, StartError> {
        let name = format!("{kind}-{index}");
        let stop = StopToken::new();

        let thread = {
            let name = name.clone();
            let stop = stop.clone();
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_loop(kind, &name, &state, &stop, delay))
        }
        .map_err(|source| StartError::Spawn {
            name: name.clone(),
            source,
        })?;

        Ok(Self {
            name,
            kind,
            stop,
            thread,
        })
    }

    pub(crate) fn request_stop(&self) {
        self.stop.request();
    }

    pub(crate) fn status(&self) -> WorkerStatus {
        let state = if self.thread.is_finished() {
            WorkerState::Finished
        } else if self.stop.is_requested() {
            WorkerState::StopRequested
        } else {
            WorkerState::Running
        };
        WorkerStatus {
            name: self.name.clone(),
            kind: self.kind,
            state,
        }
    }

    /// Wait for the thread to exit. Returns the thread name if it panicked.
    pub(crate) fn join(self) -> Result<(), String> {
        match self.thread.join() {
            Ok(()) => {
                debug!(worker = %self.name, "worker joined");
                Ok(())
            }
            Err(_) => {
                error!(worker = %self.name, "worker panicked");
                Err(self.name)
            }
        }
    }
}

fn run_loop(kind: WorkerKind, name: &str, state: &SystemState, stop: &StopToken, delay: Duration) {
    debug!(worker = name, "worker started");

    while !stop.is_requested() {
        if stop.sleep(delay) {
            break;
        }

        let result = match kind {
            WorkerKind::Producer => producer::iterate(name, state, stop),
            WorkerKind::Consumer => consumer::iterate(name, state, stop),
        };

        if let Err(Interrupted) = result {
            state.stats.record_interrupted();
            warn!(worker = name, "wait interrupted by stop request");
        }
    }

    debug!(worker = name, "worker stopped");
}

/// Run `critical` on the buffer with one slot reserved from `gate`.
///
/// Order is fixed: acquire `gate`, take the buffer lock, run `critical`,
/// drop the lock, release `complement`. The lock is never held while waiting
/// on a signal.
///
/// If the lock wait is interrupted the permit taken from `gate` is returned
/// to it, so the slot accounting stays balanced.
pub(crate) fn with_slot<T, R>(
    gate: &SlotSignal,
    complement: &SlotSignal,
    buffer: &Mutex<T>,
    stop: &StopToken,
    critical: impl FnOnce(&mut T) -> R,
) -> Result<R, Interrupted> {
    gate.acquire(stop)?;

    let mut guard = match lock_interruptible(buffer, stop) {
        Ok(guard) => guard,
        Err(interrupted) => {
            gate.release();
            return Err(interrupted);
        }
    };
    let result = critical(&mut *guard);
    drop(guard);

    complement.release();
    Ok(result)
}

fn lock_interruptible<'a, T>(
    mutex: &'a Mutex<T>,
    stop: &StopToken,
) -> Result<MutexGuard<'a, T>, Interrupted> {
    loop {
        if let Some(guard) = mutex.try_lock_for(LOCK_RETRY_INTERVAL) {
            return Ok(guard);
        }
        if stop.is_requested() {
            return Err(Interrupted);
        }
    }
}
