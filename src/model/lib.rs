//! Core data model for NeoFS: the node registry, client registry and
//! file catalog, all guarded by a single catalog mutex, plus the
//! liveness sweep and upload-time placement that operate on it.
#[macro_use]
extern crate tracing;

pub mod catalog;
pub mod liveness;
pub mod placement;
pub mod types;

pub use catalog::{Catalog, SharedCatalog, StatusSnapshot};
pub use liveness::LivenessWorker;
pub use types::*;
