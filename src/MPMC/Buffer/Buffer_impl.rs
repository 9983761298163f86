use std::collections::VecDeque;

use super::Buffer::BoundedBuffer;
use crate::error::AllocationFailure;
use crate::MPMC::Structs::Buffer_Structs::Item;

impl BoundedBuffer {
    /// Create an empty buffer with room for exactly `capacity` items.
    ///
    /// Capacity is validated as non-zero by the configuration layer; the only
    /// failure here is the allocator refusing the reservation.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocationFailure> {
        let mut storage = VecDeque::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| AllocationFailure { capacity })?;

        Ok(Self {
            capacity,
            storage,
            occupancy: 0,
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.occupancy == self.capacity
    }

    /// Append `item` at the back.
    /// Returns the item unchanged if the buffer is full.
    pub fn try_enqueue(&mut self, item: Item) -> Result<(), Item> {
        if self.is_full() {
            return Err(item);
        }

        self.storage.push_back(item);
        self.occupancy += 1;
        debug_assert_eq!(self.occupancy, self.storage.len());
        Ok(())
    }

    /// Remove and return the oldest item.
    /// Returns None if the buffer is empty.
    pub fn try_dequeue(&mut self) -> Option<Item> {
        if self.is_empty() {
            return None;
        }

        let item = self.storage.pop_front()?;
        self.occupancy -= 1;
        debug_assert_eq!(self.occupancy, self.storage.len());
        Some(item)
    }

    /// Remove up to `limit` items in FIFO order. Used by the shutdown drain.
    pub fn drain(&mut self, limit: usize) -> Vec<Item> {
        let mut drained = Vec::with_capacity(limit.min(self.occupancy));
        while drained.len() < limit {
            match self.try_dequeue() {
                Some(item) => drained.push(item),
                None => break,
            }
        }
        drained
    }
}

impl std::fmt::Debug for BoundedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::Debug::StructDebug::debug_bounded_buffer(self, f)
    }
}
