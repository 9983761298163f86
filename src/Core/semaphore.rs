// Counting signal used to gate producers (empty slots) and consumers (filled slots).

use super::stop::StopToken;
use crate::error::Interrupted;
use parking_lot::{Condvar, Mutex};

/// A blocking counting semaphore.
///
/// ### Concurrency Design:
/// - **acquire**: parks the calling thread on a condition variable until the
///   count is positive, then decrements it. The caller's [`StopToken`] is
///   checked under the same lock before every park, so a stop request followed
///   by [`interrupt_waiters`](SlotSignal::interrupt_waiters) can never be lost.
/// - **release**: increments the count and wakes at most one parked thread.
///   Which one is up to the condition variable; no FIFO order is promised.
///
/// Permits already available are always taken, even if a stop was requested.
pub struct SlotSignal {
    pub(crate) count: Mutex<usize>,
    pub(crate) cond: Condvar,
}

impl SlotSignal {
    pub fn new(initial: usize) -> Self {
        Self {
            count: Mutex::new(initial),
            cond: Condvar::new(),
        }
    }

    /// Block until a permit is available and take it.
    ///
    /// Returns [`Interrupted`] if no permit is available and `stop` has been
    /// requested, either before the call or while parked.
    pub fn acquire(&self, stop: &StopToken) -> Result<(), Interrupted> {
        let mut count = self.count.lock();
        loop {
            if *count > 0 {
                *count -= 1;
                return Ok(());
            }
            if stop.is_requested() {
                return Err(Interrupted);
            }
            self.cond.wait(&mut count);
        }
    }

    /// Return one permit and wake one waiter, if any.
    pub fn release(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.cond.notify_one();
    }

    /// Wake every parked waiter without granting a permit.
    ///
    /// Each woken waiter re-checks the count and its own stop token; waiters
    /// whose token is not requested simply park again.
    pub fn interrupt_waiters(&self) -> usize {
        let _count = self.count.lock();
        self.cond.notify_all()
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        *self.count.lock()
    }
}

impl std::fmt::Debug for SlotSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_slot_signal(self, f)
    }
}
