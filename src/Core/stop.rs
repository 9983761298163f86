use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation flag shared between a worker and its supervisor.
///
/// Cloning yields another handle to the same flag. Once requested, a stop
/// can never be withdrawn.
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<StopInner>,
}

#[derive(Default)]
struct StopInner {
    requested: AtomicBool,
    // Only used to make `sleep` wake early; the flag itself is the atomic.
    lock: Mutex<()>,
    cond: Condvar,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the stop as requested and wake any thread sleeping on this token.
    pub fn request(&self) {
        let _guard = self.inner.lock.lock();
        self.inner.requested.store(true, Ordering::Release);
        self.inner.cond.notify_all();
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.inner.requested.load(Ordering::Acquire)
    }

    /// Sleep for `duration` or until a stop is requested, whichever is first.
    ///
    /// Returns `true` if the stop was requested.
    pub fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.is_requested();
        }

        let deadline = Instant::now() + duration;
        let mut guard = self.inner.lock.lock();
        while !self.is_requested() {
            if self.inner.cond.wait_until(&mut guard, deadline).timed_out() {
                break;
            }
        }
        self.is_requested()
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("requested", &self.is_requested())
            .finish()
    }
}
