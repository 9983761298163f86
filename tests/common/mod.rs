#![allow(dead_code)]

use dmxp_bounded::{Item, ItemSink};
use parking_lot::Mutex;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Sink that remembers every sequence number it receives.
#[derive(Default)]
pub struct RecordingSink {
    consumed: Mutex<Vec<u64>>,
    drained: Mutex<Vec<u64>>,
}

impl RecordingSink {
    pub fn consumed_sequences(&self) -> Vec<u64> {
        self.consumed.lock().clone()
    }

    pub fn drained_sequences(&self) -> Vec<u64> {
        self.drained.lock().clone()
    }
}

impl ItemSink for RecordingSink {
    fn consumed(&self, item: Item) {
        self.consumed.lock().push(item.sequence());
    }

    fn drained(&self, item: Item) {
        self.drained.lock().push(item.sequence());
    }
}

/// Run `f` on another thread and panic if it has not returned within `timeout`.
pub fn within<T, F>(timeout: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(timeout)
        .expect("operation did not finish in time")
}

/// Poll `condition` every millisecond until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}
