use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use super::sink::ItemSink;
use crate::Core::SlotSignal;
use crate::MPMC::Buffer::BoundedBuffer;
use crate::MPMC::Structs::StatsSnapshot;

/// Everything the workers share. Owned by the supervisor and handed to each
/// thread as an `Arc` at spawn time.
pub(crate) struct SystemState {
    /// The buffer and the exclusive lock guarding it.
    pub(crate) buffer: Mutex<BoundedBuffer>,

    /// Free slots. Producers acquire, consumers release. Starts at capacity.
    pub(crate) empty_slots: SlotSignal,

    /// Queued items. Consumers acquire, producers release. Starts at zero.
    pub(crate) filled_slots: SlotSignal,

    /// Next sequence number to hand out. Only advanced under the buffer lock.
    next_sequence: AtomicU64,

    pub(crate) stats: Stats,

    pub(crate) sink: Arc<dyn ItemSink>,
}

impl SystemState {
    pub(crate) fn new(buffer: BoundedBuffer, sink: Arc<dyn ItemSink>) -> Self {
        let capacity = buffer.capacity();
        Self {
            buffer: Mutex::new(buffer),
            empty_slots: SlotSignal::new(capacity),
            filled_slots: SlotSignal::new(0),
            next_sequence: AtomicU64::new(1),
            stats: Stats::default(),
            sink,
        }
    }

    /// Hand out the next item sequence number. Call with the buffer lock held
    /// so numbers follow critical-section order.
    pub(crate) fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }
}

/// Instrumented counters. Lock-free; read with [`Stats::snapshot`].
#[derive(Default)]
pub(crate) struct Stats {
    produced: CachePadded<AtomicU64>,
    consumed: CachePadded<AtomicU64>,
    rejected_enqueues: AtomicU64,
    empty_dequeues: AtomicU64,
    interrupted_waits: AtomicU64,
    peak_occupancy: AtomicUsize,
}

impl Stats {
    pub(crate) fn record_produced(&self, occupancy: usize) {
        self.produced.fetch_add(1, Ordering::Relaxed);
        self.peak_occupancy.fetch_max(occupancy, Ordering::Relaxed);
    }

    pub(crate) fn record_consumed(&self) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_enqueue(&self) {
        self.rejected_enqueues.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_empty_dequeue(&self) {
        self.empty_dequeues.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_interrupted(&self) {
        self.interrupted_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            produced: self.produced.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            rejected_enqueues: self.rejected_enqueues.load(Ordering::Relaxed),
            empty_dequeues: self.empty_dequeues.load(Ordering::Relaxed),
            interrupted_waits: self.interrupted_waits.load(Ordering::Relaxed),
            peak_occupancy: self.peak_occupancy.load(Ordering::Relaxed),
        }
    }
}
