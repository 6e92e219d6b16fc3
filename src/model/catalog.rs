//! The metadata catalog: node registry, client registry and file index,
//! guarded by one mutex. No network I/O may occur while holding it. A
//! plain `std::sync::Mutex` is used deliberately instead of an async
//! one: it cannot be held across an `.await` point, which makes the
//! "never hold across I/O" rule a compile-time property rather than a
//! convention to remember.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use neofs_util::error::Error;
use neofs_util::time::now_msec;

use crate::placement;
use crate::types::*;

struct Inner {
	nodes: HashMap<String, NodeRecord>,
	clients: HashMap<String, ClientRecord>,
	files: HashMap<String, FileEntry>,
}

/// The catalog: node registry + client registry + file index, plus the
/// single mutex that guards all three.
pub struct Catalog {
	inner: Mutex<Inner>,
}

/// `Arc<Catalog>`, the shape every request handler and background
/// worker is given a clone of.
pub type SharedCatalog = Arc<Catalog>;

/// A point-in-time copy of the alive set and the full file index, taken
/// under the lock and then used lock-free.
pub struct Snapshot {
	pub alive: HashSet<String>,
	pub files: HashMap<String, FileEntry>,
}

impl Catalog {
	/// Build a catalog seeded with the static node roster; roster nodes
	/// start `Down` until their first heartbeat — admission to state UP
	/// only happens upon actually hearing from a node.
	pub fn new(roster: &[String]) -> SharedCatalog {
		let mut nodes = HashMap::new();
		for endpoint in roster {
			nodes.insert(
				endpoint.clone(),
				NodeRecord {
					endpoint: endpoint.clone(),
					state: NodeState::Down,
					last_heartbeat: 0,
				},
			);
		}
		Arc::new(Catalog {
			inner: Mutex::new(Inner {
				nodes,
				clients: HashMap::new(),
				files: HashMap::new(),
			}),
		})
	}

	// ---- Liveness tracking ----

	/// Ingest a node heartbeat. Unknown endpoints are admitted as new
	/// nodes in state UP.
	pub fn node_heartbeat(&self, endpoint: &str) {
		let now = now_msec();
		let mut inner = self.inner.lock().unwrap();
		match inner.nodes.get_mut(endpoint) {
			Some(n) => {
				if n.state == NodeState::Down {
					info!("Node {} is back UP", endpoint);
				}
				n.state = NodeState::Up;
				n.last_heartbeat = now;
			}
			None => {
				info!("Node {} heartbeated for the first time, admitting as UP", endpoint);
				inner.nodes.insert(
					endpoint.to_string(),
					NodeRecord {
						endpoint: endpoint.to_string(),
						state: NodeState::Up,
						last_heartbeat: now,
					},
				);
			}
		}
	}

	/// Ingest a client heartbeat, creating or refreshing the client
	/// record.
	pub fn client_heartbeat(&self, id: &str) {
		let now = now_msec();
		let mut inner = self.inner.lock().unwrap();
		inner
			.clients
			.entry(id.to_string())
			.and_modify(|c| c.last_heartbeat = now)
			.or_insert(ClientRecord { last_heartbeat: now });
	}

	/// Liveness sweep: mark nodes whose heartbeat is older than
	/// `node_timeout_ms` as DOWN, and evict clients older than
	/// `client_timeout_ms`.
	pub fn sweep(&self, node_timeout_ms: u64, client_timeout_ms: u64) {
		let now = now_msec();
		let mut inner = self.inner.lock().unwrap();

		for node in inner.nodes.values_mut() {
			if node.state == NodeState::Up && now.saturating_sub(node.last_heartbeat) > node_timeout_ms
			{
				warn!("Node {} missed its heartbeat window, marking DOWN", node.endpoint);
				node.state = NodeState::Down;
			}
		}

		inner
			.clients
			.retain(|_, c| now.saturating_sub(c.last_heartbeat) <= client_timeout_ms);
	}

	/// Currently-alive endpoints, in no particular order.
	pub fn alive_endpoints(&self) -> Vec<String> {
		let inner = self.inner.lock().unwrap();
		inner
			.nodes
			.values()
			.filter(|n| n.state == NodeState::Up)
			.map(|n| n.endpoint.clone())
			.collect()
	}

	/// `/status` response data: node states, active client count, and
	/// degraded file/block counts.
	pub fn status(&self) -> StatusSnapshot {
		let inner = self.inner.lock().unwrap();
		let nodes = inner
			.nodes
			.values()
			.map(|n| (n.endpoint.clone(), n.state.as_str()))
			.collect();
		let alive: HashSet<String> = inner
			.nodes
			.values()
			.filter(|n| n.state == NodeState::Up)
			.map(|n| n.endpoint.clone())
			.collect();
		let (degraded_files, degraded_blocks) = count_degraded(&inner.files, &alive);
		StatusSnapshot {
			nodes,
			active_clients: inner.clients.len(),
			degraded_files,
			degraded_blocks,
		}
	}

	// ---- Catalog mutation & placement ----

	/// Upload / allocate placement. Does not mutate the catalog unless
	/// every block can be placed.
	pub fn upload(
		&self,
		filename: &str,
		replication_factor: usize,
		num_blocks: usize,
		size: u64,
		block_size: usize,
	) -> Result<FileEntry, Error> {
		if replication_factor < 1 {
			return Err(Error::BadRequest("replication_factor must be >= 1".into()));
		}
		if num_blocks < 1 {
			return Err(Error::BadRequest("num_blocks must be >= 1".into()));
		}

		let mut inner = self.inner.lock().unwrap();
		let alive: Vec<String> = inner
			.nodes
			.values()
			.filter(|n| n.state == NodeState::Up)
			.map(|n| n.endpoint.clone())
			.collect();

		if replication_factor > alive.len() {
			return Err(Error::InsufficientNodes {
				requested: replication_factor,
				alive: alive.len(),
			});
		}

		let blocks = (0..num_blocks)
			.map(|i| BlockDescriptor {
				block_id: block_id(filename, i),
				replicas: placement::sample(&alive, replication_factor),
			})
			.collect();

		let entry = FileEntry {
			replication_factor,
			size,
			block_size,
			blocks,
		};

		// Replacing an existing file silently orphans its prior blocks
		// on nodes.
		inner.files.insert(filename.to_string(), entry.clone());

		Ok(entry)
	}

	/// Locate: the ordered block list for `filename`, each block's
	/// replicas presented alive-first then dead-last.
	pub fn locate(&self, filename: &str) -> Result<FileEntry, Error> {
		let inner = self.inner.lock().unwrap();
		let entry = inner
			.files
			.get(filename)
			.ok_or_else(|| Error::NotFound(filename.to_string()))?;
		let alive: HashSet<String> = inner
			.nodes
			.values()
			.filter(|n| n.state == NodeState::Up)
			.map(|n| n.endpoint.clone())
			.collect();

		let blocks = entry
			.blocks
			.iter()
			.map(|b| BlockDescriptor {
				block_id: b.block_id.clone(),
				replicas: b.replicas_alive_first(&alive),
			})
			.collect();

		Ok(FileEntry {
			replication_factor: entry.replication_factor,
			size: entry.size,
			block_size: entry.block_size,
			blocks,
		})
	}

	/// List: a full snapshot of the catalog.
	pub fn list(&self) -> HashMap<String, FileEntry> {
		let inner = self.inner.lock().unwrap();
		inner.files.clone()
	}

	/// Delete: atomically remove the file entry and return its prior
	/// block descriptors, for the caller to fan out deletes outside the
	/// lock.
	pub fn remove_file(&self, filename: &str) -> Result<FileEntry, Error> {
		let mut inner = self.inner.lock().unwrap();
		inner
			.files
			.remove(filename)
			.ok_or_else(|| Error::NotFound(filename.to_string()))
	}

	// ---- Re-replication support ----

	/// Snapshot the alive set and a deep copy of the catalog, then
	/// release the lock.
	pub fn snapshot(&self) -> Snapshot {
		let inner = self.inner.lock().unwrap();
		let alive = inner
			.nodes
			.values()
			.filter(|n| n.state == NodeState::Up)
			.map(|n| n.endpoint.clone())
			.collect();
		Snapshot {
			alive,
			files: inner.files.clone(),
		}
	}

	/// Re-acquire the lock to commit a single heal copy: locate the
	/// *current* file entry and block by id, and append `dst` to its
	/// replicas if not already present. A missing file or block (deleted
	/// concurrently) is silently discarded.
	pub fn commit_heal(&self, filename: &str, block_id: &str, dst: &str) {
		let mut inner = self.inner.lock().unwrap();
		let Some(entry) = inner.files.get_mut(filename) else {
			return;
		};
		let Some(block) = entry.blocks.iter_mut().find(|b| b.block_id == block_id) else {
			return;
		};
		if !block.replicas.contains(&dst.to_string()) {
			block.replicas.push(dst.to_string());
		}
	}
}

/// Aggregate counts exposed by `/status`: node states, active client
/// count, and the number of files / blocks currently in the degraded
/// state (fewer alive replicas than the file's replication factor).
pub struct StatusSnapshot {
	pub nodes: HashMap<String, &'static str>,
	pub active_clients: usize,
	pub degraded_files: usize,
	pub degraded_blocks: usize,
}

fn count_degraded(files: &HashMap<String, FileEntry>, alive: &HashSet<String>) -> (usize, usize) {
	let mut degraded_files = 0;
	let mut degraded_blocks = 0;
	for file in files.values() {
		let mut file_degraded = false;
		for block in &file.blocks {
			let alive_reps = block.replicas.iter().filter(|e| alive.contains(*e)).count();
			if alive_reps < file.replication_factor {
				degraded_blocks += 1;
				file_degraded = true;
			}
		}
		if file_degraded {
			degraded_files += 1;
		}
	}
	(degraded_files, degraded_blocks)
}

#[cfg(test)]
mod test {
	use super::*;

	fn roster(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("n{}", i)).collect()
	}

	#[test]
	fn upload_requires_alive_nodes() {
		let cat = Catalog::new(&roster(3));
		let err = cat.upload("a.txt", 2, 1, 3, 64).unwrap_err();
		assert!(matches!(err, Error::InsufficientNodes { .. }));
	}

	#[test]
	fn upload_and_locate_round_trips() {
		let cat = Catalog::new(&roster(5));
		for e in roster(5) {
			cat.node_heartbeat(&e);
		}
		let entry = cat.upload("a.txt", 3, 1, 3, 64 * 1024).unwrap();
		assert_eq!(entry.blocks.len(), 1);
		assert_eq!(entry.blocks[0].block_id, "a.txt__blk0");
		assert_eq!(entry.blocks[0].replicas.len(), 3);

		let located = cat.locate("a.txt").unwrap();
		assert_eq!(located.blocks[0].replicas.len(), 3);
	}

	#[test]
	fn delete_then_list_forgets_file() {
		let cat = Catalog::new(&roster(3));
		for e in roster(3) {
			cat.node_heartbeat(&e);
		}
		cat.upload("a.txt", 2, 1, 3, 64).unwrap();
		let removed = cat.remove_file("a.txt").unwrap();
		assert_eq!(removed.blocks.len(), 1);
		assert!(cat.list().is_empty());
		assert!(matches!(cat.remove_file("a.txt"), Err(Error::NotFound(_))));
	}

	#[test]
	fn heartbeat_admits_unknown_node() {
		let cat = Catalog::new(&roster(0));
		cat.node_heartbeat("9999");
		let status = cat.status();
		assert_eq!(status.nodes.get("9999"), Some(&"UP"));
	}

	#[test]
	fn sweep_marks_stale_nodes_down() {
		let cat = Catalog::new(&roster(1));
		cat.node_heartbeat("n0");
		// Force the heartbeat far enough in the past.
		{
			let mut inner = cat.inner.lock().unwrap();
			inner.nodes.get_mut("n0").unwrap().last_heartbeat = 0;
		}
		cat.sweep(5_000, 6_000);
		let status = cat.status();
		assert_eq!(status.nodes.get("n0"), Some(&"DOWN"));
	}

	#[test]
	fn commit_heal_appends_new_replica() {
		let cat = Catalog::new(&roster(3));
		for e in roster(3) {
			cat.node_heartbeat(&e);
		}
		cat.upload("a.txt", 2, 1, 3, 64).unwrap();
		let block_id = cat.list().get("a.txt").unwrap().blocks[0].block_id.clone();
		let before: HashSet<String> = cat
			.list()
			.get("a.txt")
			.unwrap()
			.blocks[0]
			.replicas
			.iter()
			.cloned()
			.collect();
		let dst = roster(3).into_iter().find(|e| !before.contains(e)).unwrap();

		cat.commit_heal("a.txt", &block_id, &dst);

		let after = cat.list().remove("a.txt").unwrap();
		assert_eq!(after.blocks[0].replicas.len(), 3);
		assert!(after.blocks[0].replicas.contains(&dst));
	}

	#[test]
	fn commit_heal_is_a_noop_when_replica_already_present() {
		let cat = Catalog::new(&roster(3));
		for e in roster(3) {
			cat.node_heartbeat(&e);
		}
		cat.upload("a.txt", 2, 1, 3, 64).unwrap();
		let block_id = cat.list().get("a.txt").unwrap().blocks[0].block_id.clone();
		let existing = cat.list().get("a.txt").unwrap().blocks[0].replicas[0].clone();

		cat.commit_heal("a.txt", &block_id, &existing);

		let after = cat.list().remove("a.txt").unwrap();
		assert_eq!(after.blocks[0].replicas.len(), 2);
	}

	#[test]
	fn commit_heal_discards_when_file_or_block_is_gone() {
		let cat = Catalog::new(&roster(3));
		for e in roster(3) {
			cat.node_heartbeat(&e);
		}
		cat.upload("a.txt", 2, 1, 3, 64).unwrap();
		let block_id = cat.list().get("a.txt").unwrap().blocks[0].block_id.clone();

		// File deleted concurrently with the heal copy in flight.
		cat.remove_file("a.txt").unwrap();
		cat.commit_heal("a.txt", &block_id, "n2");
		assert!(cat.list().get("a.txt").is_none());

		// File present but the block id no longer matches any block.
		cat.upload("b.txt", 2, 1, 3, 64).unwrap();
		cat.commit_heal("b.txt", "b.txt__blk99", "n2");
		let unchanged = cat.list().remove("b.txt").unwrap();
		assert_eq!(unchanged.blocks[0].replicas.len(), 2);
	}
}
