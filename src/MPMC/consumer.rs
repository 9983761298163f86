// src/MPMC/consumer.rs

use tracing::debug;

use super::state::SystemState;
use super::worker::{with_slot, WorkerKind};
use crate::error::Interrupted;
use crate::Core::StopToken;
use crate::MPMC::Buffer::BoundedBuffer;
use crate::MPMC::Structs::{Item, Operation};

/// One consumer iteration: wait for a filled slot, take the oldest item under
/// the lock, announce an empty slot, then hand the item to the sink.
pub(crate) fn iterate(name: &str, state: &SystemState, stop: &StopToken) -> Result<(), Interrupted> {
    let kind = WorkerKind::Consumer;
    let consumed = with_slot(
        kind.gate(state),
        kind.complement(state),
        &state.buffer,
        stop,
        |buffer| consume(state, buffer),
    )?;

    match consumed {
        Some(item) => {
            debug!(
                worker = name,
                operation = %Operation::Consumed,
                sequence = item.sequence(),
                "item consumed"
            );
            state.sink.consumed(item);
        }
        None => debug!(worker = name, "buffer empty after acquiring a slot"),
    }
    Ok(())
}

/// Critical section. The caller holds the buffer lock.
fn consume(state: &SystemState, buffer: &mut BoundedBuffer) -> Option<Item> {
    match buffer.try_dequeue() {
        Some(item) => {
            state.stats.record_consumed();
            Some(item)
        }
        None => {
            state.stats.record_empty_dequeue();
            None
        }
    }
}
