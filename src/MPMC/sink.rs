use crate::MPMC::Structs::Item;

/// Final owner of items leaving the buffer.
///
/// Consumers hand every dequeued item to [`ItemSink::consumed`] after
/// releasing the buffer lock. Items still queued at shutdown go to
/// [`ItemSink::drained`]. Both are called from worker or supervisor threads
/// concurrently, so implementations synchronise internally.
pub trait ItemSink: Send + Sync {
    fn consumed(&self, item: Item);

    fn drained(&self, item: Item) {
        drop(item);
    }
}

/// Sink that drops everything it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl ItemSink for Discard {
    fn consumed(&self, item: Item) {
        drop(item);
    }
}
