//! Utility crate for NeoFS: error type, config loading, time helpers,
//! and the background worker scheduling primitive shared by the
//! coordinator and storage node binaries.
#[macro_use]
extern crate tracing;

pub mod background;
pub mod config;
pub mod coordinator_client;
pub mod error;
pub mod time;

pub use coordinator_client::CoordinatorClient;

pub use error::Error;
