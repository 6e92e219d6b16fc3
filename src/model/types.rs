//! Types of the data model: node/client registries and the file catalog.

use serde::{Deserialize, Serialize};

/// A node's liveness state, derived from heartbeat recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
	Up,
	Down,
}

impl NodeState {
	pub fn as_str(&self) -> &'static str {
		match self {
			NodeState::Up => "UP",
			NodeState::Down => "DOWN",
		}
	}
}

/// Node record, identified by its stable endpoint string.
#[derive(Debug, Clone)]
pub struct NodeRecord {
	pub endpoint: String,
	pub state: NodeState,
	pub last_heartbeat: u64,
}

/// Client record, tracked only to expose an active-client count.
#[derive(Debug, Clone)]
pub struct ClientRecord {
	pub last_heartbeat: u64,
}

/// Block descriptor: `block_id` is canonically `"<filename>__blk<index>"`;
/// `replicas` is duplicate-free and ordered (the order in which replicas
/// were placed, or healed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDescriptor {
	pub block_id: String,
	pub replicas: Vec<String>,
}

impl BlockDescriptor {
	/// `replicas`, alive endpoints first (in existing order), dead
	/// endpoints last (in existing order). Clients pick a source by
	/// position, so this ordering is a contract, not a convenience.
	pub fn replicas_alive_first(&self, alive: &std::collections::HashSet<String>) -> Vec<String> {
		let (mut up, mut down): (Vec<String>, Vec<String>) =
			(Vec::new(), Vec::new());
		for r in &self.replicas {
			if alive.contains(r) {
				up.push(r.clone());
			} else {
				down.push(r.clone());
			}
		}
		up.append(&mut down);
		up
	}
}

/// File entry, keyed by filename (unique) in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
	pub replication_factor: usize,
	pub size: u64,
	pub block_size: usize,
	pub blocks: Vec<BlockDescriptor>,
}

/// Canonical block id for `(filename, index)`.
pub fn block_id(filename: &str, index: usize) -> String {
	format!("{}__blk{}", filename, index)
}

/// `ceil(size / block_size)`, the block count a non-empty file needs.
pub fn num_blocks_for_size(size: u64, block_size: usize) -> usize {
	if size == 0 {
		0
	} else {
		((size as usize) + block_size - 1) / block_size
	}
}
