//! HTTP/JSON server for the storage-node protocol:
//! `POST /block_store`, `POST /block_fetch`, `POST /block_delete`,
//! `POST /shutdown`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, StatusCode};
use tokio::sync::watch;

use neofs_util::error::Error;

use crate::store::BlockStore;
use crate::wire::{decode, encode, BlockFetchResponse, BlockIdRequest, BlockStoreRequest};

/// Serve the storage node's protocol until `/shutdown` is called, then
/// return — cooperative termination, not a hard kill.
pub async fn serve(bind_addr: SocketAddr, store: Arc<BlockStore>) -> Result<(), Error> {
	let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
	let shutdown_tx = Arc::new(shutdown_tx);

	let make_svc = make_service_fn(move |_conn| {
		let store = store.clone();
		let shutdown_tx = shutdown_tx.clone();
		async move {
			Ok::<_, Infallible>(service_fn(move |req| {
				let store = store.clone();
				let shutdown_tx = shutdown_tx.clone();
				async move { Ok::<_, Infallible>(handle(req, store, shutdown_tx).await) }
			}))
		}
	});

	let server = hyper::Server::bind(&bind_addr).serve(make_svc);
	info!("Storage node listening on {}", bind_addr);

	let graceful = server.with_graceful_shutdown(async move {
		let _ = shutdown_rx.changed().await;
		info!("Storage node shutting down");
	});

	graceful.await?;
	Ok(())
}

async fn handle(
	req: Request<Body>,
	store: Arc<BlockStore>,
	shutdown_tx: Arc<watch::Sender<bool>>,
) -> Response<Body> {
	let result = route(req, store, shutdown_tx).await;
	match result {
		Ok(resp) => resp,
		Err(e) => {
			warn!("storage node request failed: {}", e);
			let mut resp = Response::new(Body::from(format!("{}\n", e)));
			*resp.status_mut() = e.http_status_code();
			resp
		}
	}
}

async fn route(
	req: Request<Body>,
	store: Arc<BlockStore>,
	shutdown_tx: Arc<watch::Sender<bool>>,
) -> Result<Response<Body>, Error> {
	match (req.method(), req.uri().path()) {
		(&Method::POST, "/block_store") => handle_block_store(req, store).await,
		(&Method::POST, "/block_fetch") => handle_block_fetch(req, store).await,
		(&Method::POST, "/block_delete") => handle_block_delete(req, store).await,
		(&Method::POST, "/shutdown") => {
			let _ = shutdown_tx.send(true);
			Ok(Response::new(Body::from("\"Shutting down\"")))
		}
		_ => Ok(Response::builder()
			.status(StatusCode::NOT_FOUND)
			.body(Body::from("not found"))?),
	}
}

async fn parse_json_body<T: for<'de> serde::Deserialize<'de>>(
	req: Request<Body>,
) -> Result<T, Error> {
	let body = hyper::body::to_bytes(req.into_body()).await?;
	serde_json::from_slice(&body)
		.map_err(|e| Error::BadRequest(format!("invalid JSON body: {}", e)))
}

fn json_ok_response<T: serde::Serialize>(value: &T) -> Result<Response<Body>, Error> {
	let body = serde_json::to_vec(value)?;
	Ok(Response::builder()
		.header(http::header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))?)
}

async fn handle_block_store(
	req: Request<Body>,
	store: Arc<BlockStore>,
) -> Result<Response<Body>, Error> {
	let body: BlockStoreRequest = parse_json_body(req).await?;
	if body.block_id.is_empty() {
		return Err(Error::BadRequest("missing block_id".into()));
	}
	let data = decode(&body.data)?;
	store.put(&body.block_id, &data).await?;
	Ok(Response::new(Body::from("\"OK\"")))
}

async fn handle_block_fetch(
	req: Request<Body>,
	store: Arc<BlockStore>,
) -> Result<Response<Body>, Error> {
	let body: BlockIdRequest = parse_json_body(req).await?;
	let data = store.get(&body.block_id).await?;
	json_ok_response(&BlockFetchResponse { data: encode(&data) })
}

async fn handle_block_delete(
	req: Request<Body>,
	store: Arc<BlockStore>,
) -> Result<Response<Body>, Error> {
	let body: BlockIdRequest = parse_json_body(req).await?;
	store.delete(&body.block_id).await?;
	Ok(Response::new(Body::from("\"OK\"")))
}
