//! JSON wire types for the storage-node protocol.
//!
//! Block bytes are base64-encoded in the `data` field: the wire format
//! is not the stored byte sequence for arbitrary binary data otherwise,
//! and this system makes no assumption that uploaded files are UTF-8.
//! Applied uniformly by both the node's HTTP handlers and the peer
//! client the coordinator uses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockStoreRequest {
	pub block_id: String,
	pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockIdRequest {
	pub block_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockFetchResponse {
	pub data: String,
}

pub fn encode(bytes: &[u8]) -> String {
	base64::encode(bytes)
}

pub fn decode(data: &str) -> Result<Vec<u8>, neofs_util::Error> {
	base64::decode(data).map_err(|e| neofs_util::Error::BadRequest(format!("invalid base64: {}", e)))
}
