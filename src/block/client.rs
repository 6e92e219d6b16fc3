//! Peer client for the storage-node protocol: used by the coordinator's
//! delete fan-out and by the re-replication engine's GetBlock/PutBlock
//! calls. All calls are bounded by a timeout and a timed-out call is
//! treated as a failure.

use std::time::Duration;

use neofs_util::error::Error;

use crate::wire::{decode, encode, BlockFetchResponse, BlockIdRequest, BlockStoreRequest};

/// Timeout for block transfers.
pub const BLOCK_TRANSFER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct NodeClient {
	http: reqwest::Client,
}

impl NodeClient {
	pub fn new() -> Self {
		Self {
			http: reqwest::Client::builder()
				.timeout(BLOCK_TRANSFER_TIMEOUT)
				.build()
				.expect("failed to build HTTP client"),
		}
	}

	fn url(endpoint: &str, path: &str) -> String {
		if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
			format!("{}{}", endpoint, path)
		} else {
			format!("http://{}{}", endpoint, path)
		}
	}

	/// GetBlock(block_id) from `endpoint`.
	pub async fn get_block(&self, endpoint: &str, block_id: &str) -> Result<Vec<u8>, Error> {
		let resp = self
			.http
			.post(Self::url(endpoint, "/block_fetch"))
			.json(&BlockIdRequest {
				block_id: block_id.to_string(),
			})
			.send()
			.await?;
		if !resp.status().is_success() {
			return Err(Error::NodeUnreachable(format!(
				"{} returned {} for GetBlock({})",
				endpoint,
				resp.status(),
				block_id
			)));
		}
		let body: BlockFetchResponse = resp.json().await?;
		decode(&body.data)
	}

	/// PutBlock(block_id, bytes) to `endpoint`.
	pub async fn put_block(&self, endpoint: &str, block_id: &str, data: &[u8]) -> Result<(), Error> {
		let resp = self
			.http
			.post(Self::url(endpoint, "/block_store"))
			.json(&BlockStoreRequest {
				block_id: block_id.to_string(),
				data: encode(data),
			})
			.send()
			.await?;
		if !resp.status().is_success() {
			return Err(Error::NodeUnreachable(format!(
				"{} returned {} for PutBlock({})",
				endpoint,
				resp.status(),
				block_id
			)));
		}
		Ok(())
	}

	/// DeleteBlock(block_id) on `endpoint`. NotFound (404) is not an
	/// error for the caller — delete is best-effort.
	pub async fn delete_block(&self, endpoint: &str, block_id: &str) -> Result<(), Error> {
		let resp = self
			.http
			.post(Self::url(endpoint, "/block_delete"))
			.json(&BlockIdRequest {
				block_id: block_id.to_string(),
			})
			.send()
			.await?;
		if resp.status().is_success() || resp.status() == reqwest::StatusCode::NOT_FOUND {
			Ok(())
		} else {
			Err(Error::NodeUnreachable(format!(
				"{} returned {} for DeleteBlock({})",
				endpoint,
				resp.status(),
				block_id
			)))
		}
	}
}

impl Default for NodeClient {
	fn default() -> Self {
		Self::new()
	}
}
