//! The re-replication pass itself: one tick walks a snapshot of the
//! catalog taken under the lock, does the GetBlock / PutBlock I/O with
//! the lock released, then re-acquires it once per healed block to
//! commit the result.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use neofs_block::NodeClient;
use neofs_model::{placement, SharedCatalog};
use neofs_util::background::worker::{Worker, WorkerStatus};
use neofs_util::error::Error;

/// Periodic re-replication worker. Spawned once onto the coordinator's
/// `BackgroundRunner` alongside the liveness sweep.
pub struct HealWorker {
	catalog: SharedCatalog,
	client: NodeClient,
	sweep_interval: Duration,
}

impl HealWorker {
	pub fn new(catalog: SharedCatalog, sweep_interval: Duration) -> Self {
		Self {
			catalog,
			client: NodeClient::new(),
			sweep_interval,
		}
	}

	/// Run a single re-replication pass over the whole catalog, healing
	/// every under-replicated block it can.
	async fn heal_pass(&self) {
		let snapshot = self.catalog.snapshot();

		for (filename, entry) in snapshot.files.iter() {
			for block in entry.blocks.iter() {
				let alive_reps: Vec<String> = block
					.replicas
					.iter()
					.filter(|e| snapshot.alive.contains(*e))
					.cloned()
					.collect();

				if alive_reps.len() >= entry.replication_factor || alive_reps.is_empty() {
					continue;
				}

				let candidates: Vec<String> = snapshot
					.alive
					.iter()
					.filter(|e| !block.replicas.contains(*e))
					.cloned()
					.collect();
				if candidates.is_empty() {
					continue;
				}

				let src = &alive_reps[0];
				let dst = match placement::pick_one(&candidates) {
					Some(d) => d,
					None => continue,
				};

				let data = match self.client.get_block(src, &block.block_id).await {
					Ok(data) => data,
					Err(e) => {
						warn!(
							"heal: GetBlock({}) from {} failed, skipping this round: {}",
							block.block_id, src, e
						);
						continue;
					}
				};

				if let Err(e) = self.client.put_block(&dst, &block.block_id, &data).await {
					warn!(
						"heal: PutBlock({}) to {} failed, skipping this round: {}",
						block.block_id, dst, e
					);
					continue;
				}

				self.catalog.commit_heal(filename, &block.block_id, &dst);
				info!(
					"heal: replicated block {} of {} from {} to {}",
					block.block_id, filename, src, dst
				);
			}
		}
	}
}

#[async_trait]
impl Worker for HealWorker {
	fn name(&self) -> String {
		"Re-replication worker".into()
	}

	async fn work(&mut self, _must_exit: &mut watch::Receiver<bool>) -> Result<WorkerStatus, Error> {
		self.heal_pass().await;
		Ok(WorkerStatus::Idle)
	}

	async fn wait_for_work(&mut self, _must_exit: &watch::Receiver<bool>) -> WorkerStatus {
		tokio::time::sleep(self.sweep_interval).await;
		WorkerStatus::Busy
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use neofs_model::Catalog;

	#[tokio::test]
	async fn heal_pass_skips_when_fully_replicated() {
		let cat = Catalog::new(&["n0".into(), "n1".into(), "n2".into()]);
		for e in ["n0", "n1", "n2"] {
			cat.node_heartbeat(e);
		}
		cat.upload("a.txt", 3, 1, 3, 64).unwrap();

		let worker = HealWorker::new(cat.clone(), Duration::from_millis(1));
		// All three replicas are alive, so there is nothing to heal; this
		// should not panic even though no storage nodes are listening.
		worker.heal_pass().await;

		let located = cat.locate("a.txt").unwrap();
		assert_eq!(located.blocks[0].replicas.len(), 3);
	}

	#[tokio::test]
	async fn heal_pass_skips_when_no_source_alive() {
		let cat = Catalog::new(&["n0".into(), "n1".into()]);
		cat.node_heartbeat("n0");
		cat.node_heartbeat("n1");
		cat.upload("a.txt", 2, 1, 3, 64).unwrap();
		// n0 and n1 both go down: no alive replica exists to copy from.
		cat.sweep(0, u64::MAX);

		let worker = HealWorker::new(cat.clone(), Duration::from_millis(1));
		worker.heal_pass().await;

		// Nothing changed: commit_heal was never reached.
		let entry = cat.list().remove("a.txt").unwrap();
		assert_eq!(entry.blocks[0].replicas.len(), 2);
	}
}
