// Plain value types that travel through the bounded buffer.

use std::fmt;

/// A unit of work carrying its production sequence number.
///
/// Deliberately not `Clone`: an item is owned by exactly one of the producer,
/// the buffer, or the consumer at any time, and ownership moves between them.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    sequence: u64,
}

impl Item {
    pub fn new(sequence: u64) -> Self {
        Self { sequence }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// The buffer operation a worker performs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Produced,
    Consumed,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Produced => "produced",
            Operation::Consumed => "consumed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time copy of the system counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Successful enqueues.
    pub produced: u64,
    /// Successful dequeues.
    pub consumed: u64,
    /// Producer critical sections that found the buffer full.
    pub rejected_enqueues: u64,
    /// Consumer critical sections that found the buffer empty.
    pub empty_dequeues: u64,
    /// Signal or lock waits cut short by a stop request.
    pub interrupted_waits: u64,
    /// Highest occupancy observed inside a critical section.
    pub peak_occupancy: usize,
}
