//! Coordinator request handlers. Each handler acquires the catalog lock
//! only for the in-memory portion of its work; delete's block fan-out
//! runs after the lock is released.

use std::collections::HashMap;

use hyper::{Body, Request, Response};

use neofs_block::NodeClient;
use neofs_model::{BlockDescriptor, SharedCatalog};
use neofs_util::error::Error;

use crate::wire::*;

pub(crate) async fn parse_json_body<T: for<'de> serde::Deserialize<'de>>(
	req: Request<Body>,
) -> Result<T, Error> {
	let body = hyper::body::to_bytes(req.into_body()).await?;
	serde_json::from_slice(&body).map_err(|e| Error::BadRequest(format!("invalid JSON body: {}", e)))
}

pub(crate) fn json_ok_response<T: serde::Serialize>(value: &T) -> Result<Response<Body>, Error> {
	let body = serde_json::to_vec(value)?;
	Ok(Response::builder()
		.header(http::header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))?)
}

pub(crate) fn plain_ok() -> Result<Response<Body>, Error> {
	Ok(Response::new(Body::from("\"OK\"")))
}

fn blocks_view(blocks: &[BlockDescriptor]) -> Vec<BlockView> {
	blocks
		.iter()
		.map(|b| BlockView {
			id: b.block_id.clone(),
			nodes: b.replicas.clone(),
		})
		.collect()
}

pub async fn status(catalog: &SharedCatalog) -> Result<Response<Body>, Error> {
	let s = catalog.status();
	json_ok_response(&StatusResponse {
		nodes: s.nodes,
		active_clients: s.active_clients,
		degraded_files: s.degraded_files,
		degraded_blocks: s.degraded_blocks,
	})
}

pub async fn heartbeat(
	req: Request<Body>,
	catalog: &SharedCatalog,
) -> Result<Response<Body>, Error> {
	let body: HeartbeatRequest = parse_json_body(req).await?;
	let port = body
		.port
		.ok_or_else(|| Error::BadRequest("missing port".into()))?;
	catalog.node_heartbeat(&port);
	plain_ok()
}

pub async fn client_heartbeat(
	req: Request<Body>,
	catalog: &SharedCatalog,
) -> Result<Response<Body>, Error> {
	let body: ClientHeartbeatRequest = parse_json_body(req).await?;
	let id = body.id.ok_or_else(|| Error::BadRequest("missing id".into()))?;
	catalog.client_heartbeat(&id);
	plain_ok()
}

pub async fn upload(
	req: Request<Body>,
	catalog: &SharedCatalog,
	default_replication_factor: usize,
	block_size: usize,
) -> Result<Response<Body>, Error> {
	let body: UploadRequest = parse_json_body(req).await?;
	if body.filename.is_empty() {
		return Err(Error::BadRequest("missing filename".into()));
	}
	let replication_factor = body.replication_factor.unwrap_or(default_replication_factor);
	let size = body.size.unwrap_or(0);
	// `num_blocks` is derived from `size` when it is given and positive;
	// the caller-supplied `num_blocks` is only authoritative when `size`
	// is absent or zero.
	let num_blocks = match neofs_model::num_blocks_for_size(size, block_size) {
		0 => body.num_blocks,
		n => n,
	};
	let entry = catalog.upload(&body.filename, replication_factor, num_blocks, size, block_size)?;
	json_ok_response(&UploadResponse {
		filename: body.filename,
		replication_factor: entry.replication_factor,
		block_size: entry.block_size,
		blocks: blocks_view(&entry.blocks),
	})
}

pub async fn locate(req: Request<Body>, catalog: &SharedCatalog) -> Result<Response<Body>, Error> {
	let body: FilenameRequest = parse_json_body(req).await?;
	let entry = catalog.locate(&body.filename)?;
	json_ok_response(&LocateResponse {
		filename: body.filename,
		size: entry.size,
		block_size: entry.block_size,
		replication_factor: entry.replication_factor,
		blocks: blocks_view(&entry.blocks),
	})
}

pub async fn list(catalog: &SharedCatalog) -> Result<Response<Body>, Error> {
	let files = catalog.list();
	let body: HashMap<String, ListEntry> = files
		.into_iter()
		.map(|(name, entry)| {
			(
				name,
				ListEntry {
					replication_factor: entry.replication_factor,
					size: entry.size,
					block_size: entry.block_size,
					num_blocks: entry.blocks.len(),
					blocks: blocks_view(&entry.blocks),
				},
			)
		})
		.collect();
	json_ok_response(&body)
}

/// Delete: remove the file entry under the lock, then fan the block
/// deletes out to every replica with the lock released. A node that
/// can't be reached is logged and skipped; it still holds an orphaned
/// block, which is harmless.
pub async fn delete(
	req: Request<Body>,
	catalog: &SharedCatalog,
	client: &NodeClient,
) -> Result<Response<Body>, Error> {
	let body: FilenameRequest = parse_json_body(req).await?;
	let entry = catalog.remove_file(&body.filename)?;

	let mut deleted_from: HashMap<String, Vec<String>> = HashMap::new();
	for block in &entry.blocks {
		for endpoint in &block.replicas {
			match client.delete_block(endpoint, &block.block_id).await {
				Ok(()) => deleted_from
					.entry(endpoint.clone())
					.or_default()
					.push(block.block_id.clone()),
				Err(e) => warn!(
					"delete: could not reach {} to delete block {}: {}",
					endpoint, block.block_id, e
				),
			}
		}
	}

	json_ok_response(&DeleteResponse {
		filename: body.filename,
		deleted_from,
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use neofs_model::Catalog;

	fn post(body: &str) -> Request<Body> {
		Request::builder()
			.method("POST")
			.body(Body::from(body.to_string()))
			.unwrap()
	}

	#[tokio::test]
	async fn heartbeat_requires_port() {
		let catalog = Catalog::new(&[]);
		let err = heartbeat(post("{}"), &catalog).await.unwrap_err();
		assert!(matches!(err, Error::BadRequest(_)));
	}

	#[tokio::test]
	async fn heartbeat_then_status_reports_up() {
		let catalog = Catalog::new(&[]);
		heartbeat(post(r#"{"port":"n0"}"#), &catalog).await.unwrap();
		let status = catalog.status();
		assert_eq!(status.nodes.get("n0"), Some(&"UP"));
	}

	#[tokio::test]
	async fn upload_then_locate_round_trips() {
		let catalog = Catalog::new(&["n0".into(), "n1".into(), "n2".into()]);
		for e in ["n0", "n1", "n2"] {
			catalog.node_heartbeat(e);
		}
		let resp = upload(
			post(r#"{"filename":"a.txt","num_blocks":1,"size":3}"#),
			&catalog,
			2,
			64,
		)
		.await;
		assert!(resp.is_ok());

		let located = locate(post(r#"{"filename":"a.txt"}"#), &catalog).await;
		assert!(located.is_ok());
	}

	#[tokio::test]
	async fn upload_derives_num_blocks_from_size_when_positive() {
		let catalog = Catalog::new(&["n0".into(), "n1".into(), "n2".into()]);
		for e in ["n0", "n1", "n2"] {
			catalog.node_heartbeat(e);
		}
		// size=130 with block_size=64 spans 3 blocks; the caller's
		// num_blocks=1 must be overridden by the size-derived count
		// (ceil(size / block_size) when size > 0).
		upload(
			post(r#"{"filename":"big.bin","num_blocks":1,"size":130}"#),
			&catalog,
			2,
			64,
		)
		.await
		.unwrap();

		assert_eq!(
			catalog.list().get("big.bin").unwrap().blocks.len(),
			3,
			"ceil(130/64) == 3"
		);
	}

	#[tokio::test]
	async fn upload_uses_supplied_num_blocks_when_size_absent() {
		let catalog = Catalog::new(&["n0".into(), "n1".into(), "n2".into()]);
		for e in ["n0", "n1", "n2"] {
			catalog.node_heartbeat(e);
		}
		upload(
			post(r#"{"filename":"c.txt","num_blocks":4}"#),
			&catalog,
			2,
			64,
		)
		.await
		.unwrap();

		assert_eq!(catalog.list().get("c.txt").unwrap().blocks.len(), 4);
	}

	#[tokio::test]
	async fn locate_missing_file_is_not_found() {
		let catalog = Catalog::new(&[]);
		let err = locate(post(r#"{"filename":"missing.txt"}"#), &catalog)
			.await
			.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}
}
