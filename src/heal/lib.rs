//! Re-replication engine: the periodic background task that brings
//! under-replicated blocks back up to their file's replication factor
//! by copying an existing replica onto a freshly-chosen node.
#[macro_use]
extern crate tracing;

pub mod engine;

pub use engine::HealWorker;
