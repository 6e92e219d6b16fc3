//! Coordinator control-plane crate: the HTTP/JSON server and request
//! handlers that sit in front of the catalog and drive the
//! storage-node protocol client for delete fan-out.
#[macro_use]
extern crate tracing;

pub mod handlers;
pub mod server;
pub mod wire;

pub use server::{serve, ApiConfig};
