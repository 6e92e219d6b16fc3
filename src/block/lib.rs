//! Storage node: a durable per-block key→bytes store with a small
//! HTTP/JSON protocol, plus the peer client used by the coordinator's
//! delete fan-out and the re-replication engine to talk to that
//! protocol.
#[macro_use]
extern crate tracing;

pub mod client;
pub mod server;
pub mod store;
pub mod wire;

pub use client::NodeClient;
pub use store::BlockStore;
