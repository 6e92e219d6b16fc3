//! Liveness-and-reaper background task: periodically sweeps the
//! catalog, marking nodes that missed their heartbeat window DOWN and
//! evicting stale client records.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use neofs_util::background::worker::{Worker, WorkerStatus};
use neofs_util::error::Error;

use crate::catalog::SharedCatalog;

pub struct LivenessWorker {
	catalog: SharedCatalog,
	sweep_interval: Duration,
	node_timeout: Duration,
	client_timeout: Duration,
}

impl LivenessWorker {
	pub fn new(
		catalog: SharedCatalog,
		sweep_interval: Duration,
		node_timeout: Duration,
		client_timeout: Duration,
	) -> Self {
		Self {
			catalog,
			sweep_interval,
			node_timeout,
			client_timeout,
		}
	}
}

#[async_trait]
impl Worker for LivenessWorker {
	fn name(&self) -> String {
		"Liveness sweep worker".into()
	}

	async fn work(&mut self, _must_exit: &mut watch::Receiver<bool>) -> Result<WorkerStatus, Error> {
		self.catalog.sweep(
			self.node_timeout.as_millis() as u64,
			self.client_timeout.as_millis() as u64,
		);
		Ok(WorkerStatus::Idle)
	}

	async fn wait_for_work(&mut self, _must_exit: &watch::Receiver<bool>) -> WorkerStatus {
		tokio::time::sleep(self.sweep_interval).await;
		WorkerStatus::Busy
	}
}
