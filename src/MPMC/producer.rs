// In src/MPMC/producer.rs
use tracing::debug;

use super::state::SystemState;
use super::worker::{with_slot, WorkerKind};
use crate::error::Interrupted;
use crate::Core::StopToken;
use crate::MPMC::Buffer::BoundedBuffer;
use crate::MPMC::Structs::{Item, Operation};

/// One producer iteration: wait for an empty slot, enqueue a freshly
/// numbered item under the lock, then announce a filled slot.
pub(crate) fn iterate(name: &str, state: &SystemState, stop: &StopToken) -> Result<(), Interrupted> {
    let kind = WorkerKind::Producer;
    let produced = with_slot(
        kind.gate(state),
        kind.complement(state),
        &state.buffer,
        stop,
        |buffer| produce(state, buffer),
    )?;

    match produced {
        Some(sequence) => debug!(
            worker = name,
            operation = %Operation::Produced,
            sequence,
            "item produced"
        ),
        None => debug!(worker = name, "buffer full after acquiring a slot"),
    }
    Ok(())
}

/// Critical section. The caller holds the buffer lock.
///
/// The occupancy check is redundant while the signals and the buffer agree,
/// but they may briefly disagree while shutdown is draining.
fn produce(state: &SystemState, buffer: &mut BoundedBuffer) -> Option<u64> {
    if buffer.occupancy() >= buffer.capacity() {
        state.stats.record_rejected_enqueue();
        return None;
    }

    let item = Item::new(state.next_sequence());
    let sequence = item.sequence();
    match buffer.try_enqueue(item) {
        Ok(()) => {
            state.stats.record_produced(buffer.occupancy());
            Some(sequence)
        }
        Err(_) => {
            state.stats.record_rejected_enqueue();
            None
        }
    }
}
