//! Configuration file loading.
//!
//! §6 specifies the coordinator's configuration file as JSON, so this
//! is a small `OpenOptions::read` + `read_to_string` + deserialize
//! loader over `serde_json` rather than a TOML parser.

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// One entry of the static node roster read at coordinator start (§3, §6).
#[derive(Deserialize, Debug, Clone)]
pub struct NodeRosterEntry {
	pub port: u16,
}

/// Coordinator configuration file: `{ "replication_factor": int, "nodes": [ { "port": int }, ... ] }`.
#[derive(Deserialize, Debug, Clone)]
pub struct CoordinatorConfig {
	/// Default replication factor, used when an upload request omits one.
	pub replication_factor: usize,
	/// Static node roster. Endpoints are derived as `<node_host>:<port>`.
	pub nodes: Vec<NodeRosterEntry>,

	/// Address the coordinator's HTTP/JSON API binds to. Not part of
	/// spec.md's explicit config contract, but the ambient bind-address
	/// parameter every server process config carries; defaults to the
	/// spec's documented default port (§6).
	#[serde(default = "default_coordinator_bind_addr")]
	pub bind_addr: SocketAddr,

	/// Hostname (or IP) component used to build node endpoints from
	/// the `nodes` roster's bare ports.
	#[serde(default = "default_node_host")]
	pub node_host: String,

	#[serde(default = "default_node_timeout_secs")]
	pub node_timeout_secs: u64,
	#[serde(default = "default_client_timeout_secs")]
	pub client_timeout_secs: u64,
	#[serde(default = "default_sweep_interval_secs")]
	pub sweep_interval_secs: u64,
	#[serde(default = "default_block_size")]
	pub block_size: usize,
}

fn default_coordinator_bind_addr() -> SocketAddr {
	"0.0.0.0:4000".parse().unwrap()
}
fn default_node_host() -> String {
	"127.0.0.1".to_string()
}
fn default_node_timeout_secs() -> u64 {
	5
}
fn default_client_timeout_secs() -> u64 {
	6
}
fn default_sweep_interval_secs() -> u64 {
	2
}
fn default_block_size() -> usize {
	64 * 1024
}

impl CoordinatorConfig {
	/// Endpoint strings for the static roster, e.g. `127.0.0.1:5001`.
	pub fn roster_endpoints(&self) -> Vec<String> {
		self.nodes
			.iter()
			.map(|n| format!("{}:{}", self.node_host, n.port))
			.collect()
	}
}

/// Storage-node configuration: its own listen address, storage
/// directory, and the coordinator it heartbeats to. This is process
/// bootstrap, not core logic; implemented here only as a thin ambient
/// loader.
#[derive(Deserialize, Debug, Clone)]
pub struct NodeConfig {
	pub bind_addr: SocketAddr,
	pub data_dir: PathBuf,
	pub coordinator_addr: String,

	#[serde(default = "default_node_heartbeat_period_secs")]
	pub heartbeat_period_secs: u64,
}

fn default_node_heartbeat_period_secs() -> u64 {
	1
}

pub fn read_coordinator_config(path: impl AsRef<Path>) -> Result<CoordinatorConfig, Error> {
	read_json(path)
}

pub fn read_node_config(path: impl AsRef<Path>) -> Result<NodeConfig, Error> {
	read_json(path)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T, Error> {
	let mut file = std::fs::OpenOptions::new().read(true).open(path.as_ref())?;
	let mut contents = String::new();
	file.read_to_string(&mut contents)?;
	Ok(serde_json::from_str(&contents)?)
}
