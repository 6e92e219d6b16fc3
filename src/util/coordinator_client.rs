//! Tiny client for the coordinator's node-heartbeat endpoint, used by
//! the storage node's heartbeat-emitter task. Kept in `neofs_util`
//! since it has no dependency on the block store or the catalog.
//! Client heartbeats (`/client_heartbeat`) have no caller in this
//! workspace — the client process that would emit them is out of
//! scope (spec §1) — so no client for that endpoint lives here.

use std::time::Duration;

use serde::Serialize;

use crate::error::Error;

/// Timeout for control messages.
pub const CONTROL_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Serialize)]
struct HeartbeatBody<'a> {
	port: &'a str,
}

#[derive(Clone)]
pub struct CoordinatorClient {
	http: reqwest::Client,
	coordinator_addr: String,
}

impl CoordinatorClient {
	pub fn new(coordinator_addr: String) -> Self {
		Self {
			http: reqwest::Client::builder()
				.timeout(CONTROL_TIMEOUT)
				.build()
				.expect("failed to build HTTP client"),
			coordinator_addr,
		}
	}

	fn url(&self, path: &str) -> String {
		if self.coordinator_addr.starts_with("http://")
			|| self.coordinator_addr.starts_with("https://")
		{
			format!("{}{}", self.coordinator_addr, path)
		} else {
			format!("http://{}{}", self.coordinator_addr, path)
		}
	}

	/// Emit a node heartbeat. Failure to reach the coordinator is
	/// silently ignored by the caller: this just reports it.
	pub async fn heartbeat(&self, endpoint: &str) -> Result<(), Error> {
		self.http
			.post(self.url("/heartbeat"))
			.json(&HeartbeatBody { port: endpoint })
			.send()
			.await?;
		Ok(())
	}
}
