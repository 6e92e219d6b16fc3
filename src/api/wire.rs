//! Request/response JSON shapes of the coordinator's control plane.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
	pub nodes: HashMap<String, &'static str>,
	pub active_clients: usize,
	pub degraded_files: usize,
	pub degraded_blocks: usize,
}

#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
	pub port: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientHeartbeatRequest {
	pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
	pub filename: String,
	pub replication_factor: Option<usize>,
	pub num_blocks: usize,
	pub size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BlockView {
	pub id: String,
	pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
	pub filename: String,
	pub replication_factor: usize,
	pub block_size: usize,
	pub blocks: Vec<BlockView>,
}

#[derive(Debug, Deserialize)]
pub struct FilenameRequest {
	pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct LocateResponse {
	pub filename: String,
	pub size: u64,
	pub block_size: usize,
	pub replication_factor: usize,
	pub blocks: Vec<BlockView>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
	pub filename: String,
	pub deleted_from: HashMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ListEntry {
	pub replication_factor: usize,
	pub size: u64,
	pub block_size: usize,
	pub num_blocks: usize,
	pub blocks: Vec<BlockView>,
}
