// This is the shared bounded FIFO that producers fill and consumers drain.

use crate::MPMC::Structs::Buffer_Structs::Item;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of [`Item`]s.
///
/// The buffer has no lock of its own. It is always reached through the
/// `Mutex` in the system state, and every method that mutates it assumes the
/// caller holds that lock.
///
/// ### Invariants:
/// - `occupancy == storage.len()` whenever the lock is released.
/// - `0 <= occupancy <= capacity`.
/// - `storage` is reserved for `capacity` items up front, so enqueueing never
///   allocates.
pub struct BoundedBuffer {
    /// Number of slots. Always greater than zero.
    pub(crate) capacity: usize,

    /// Queued items, oldest at the front.
    pub(crate) storage: VecDeque<Item>,

    /// Number of queued items, tracked separately from `storage` so the
    /// occupancy invariant can be checked.
    pub(crate) occupancy: usize,
}
