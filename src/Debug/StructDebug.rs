use std::fmt;

use crate::Core::SlotSignal;
use crate::MPMC::supervisor::Supervisor;
use crate::MPMC::Buffer::BoundedBuffer;

/// Debug function for BoundedBuffer
///
/// Shows capacity and occupancy plus the sequence range currently queued,
/// without listing every item.
pub fn debug_bounded_buffer(buffer: &BoundedBuffer, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let oldest = buffer.storage.front().map(|item| item.sequence());
    let newest = buffer.storage.back().map(|item| item.sequence());
    f.debug_struct("BoundedBuffer")
        .field("capacity", &buffer.capacity)
        .field("occupancy", &buffer.occupancy)
        .field("oldest", &oldest)
        .field("newest", &newest)
        .finish()
}

/// Debug function for SlotSignal
///
/// Uses `try_lock` so formatting never blocks behind a worker.
pub fn debug_slot_signal(signal: &SlotSignal, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match signal.count.try_lock() {
        Some(count) => f.debug_struct("SlotSignal").field("count", &*count).finish(),
        None => f
            .debug_struct("SlotSignal")
            .field("count", &"<locked>")
            .finish(),
    }
}

/// Debug function for Supervisor
///
/// Shows the configuration, worker names and current counters.
pub fn debug_supervisor(supervisor: &Supervisor, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Supervisor")
        .field("config", supervisor.config())
        .field("workers", &supervisor.worker_states())
        .field("stats", &supervisor.stats())
        .finish_non_exhaustive()
}
