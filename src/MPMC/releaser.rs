// Shutdown-only helper that wakes workers parked on a slot signal.

use parking_lot::{Condvar, Mutex};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

use super::state::SystemState;
use super::worker::WorkerKind;

/// Wakes every worker of one kind that is parked on its gate signal.
///
/// The releaser thread sleeps on a latch. Each [`nudge`](Releaser::nudge)
/// makes it interrupt all waiters on the target signal once; woken workers
/// whose stop token is set leave `acquire` with `Interrupted`, the rest park
/// again. Nudge only after requesting the stops you want observed.
pub(crate) struct Releaser {
    name: String,
    latch: Arc<Latch>,
    thread: JoinHandle<()>,
}

#[derive(Default)]
struct Latch {
    state: Mutex<LatchState>,
    cond: Condvar,
}

#[derive(Default)]
struct LatchState {
    pending: bool,
    stopped: bool,
}

impl Releaser {
    /// Spawn the releaser for workers of `kind`. It targets `kind`'s gate:
    /// filled slots for consumers, empty slots for producers.
    pub(crate) fn spawn(kind: WorkerKind, state: Arc<SystemState>) -> io::Result<Self> {
        let name = format!("{kind}-releaser");
        let latch = Arc::new(Latch::default());

        let thread = {
            let name = name.clone();
            let latch = Arc::clone(&latch);
            thread::Builder::new()
                .name(name.clone())
                .spawn(move || run(&name, kind, &state, &latch))?
        };

        Ok(Self {
            name,
            latch,
            thread,
        })
    }

    pub(crate) fn nudge(&self) {
        let mut state = self.latch.state.lock();
        state.pending = true;
        self.latch.cond.notify_one();
    }

    /// Stop the releaser and join it. Pending nudges are served first.
    /// Returns the thread name if it panicked.
    pub(crate) fn stop(self) -> Result<(), String> {
        {
            let mut state = self.latch.state.lock();
            state.stopped = true;
            self.latch.cond.notify_one();
        }

        match self.thread.join() {
            Ok(()) => Ok(()),
            Err(_) => {
                error!(releaser = %self.name, "releaser panicked");
                Err(self.name)
            }
        }
    }
}

fn run(name: &str, kind: WorkerKind, state: &SystemState, latch: &Latch) {
    let signal = kind.gate(state);
    let mut rounds = 0u64;
    let mut woken = 0usize;

    loop {
        {
            let mut pending = latch.state.lock();
            while !pending.pending && !pending.stopped {
                latch.cond.wait(&mut pending);
            }
            if !pending.pending {
                break;
            }
            pending.pending = false;
        }

        woken += signal.interrupt_waiters();
        rounds += 1;
    }

    debug!(releaser = name, rounds, woken, "releaser stopped");
}
