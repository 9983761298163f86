mod builder;
mod consumer;
mod producer;
mod releaser;
mod sink;
mod state;
pub mod supervisor;
mod worker;

pub use builder::{Config, SystemBuilder};
pub use sink::{Discard, ItemSink};
pub use supervisor::{ShutdownReport, Supervisor};
pub use worker::{WorkerKind, WorkerState, WorkerStatus};

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub use Buffer::BoundedBuffer; // re-export for stable path
}

pub mod Structs {
    pub mod Buffer_Structs;
    pub use Buffer_Structs::{Item, Operation, StatsSnapshot}; // re-export for stable path
}
