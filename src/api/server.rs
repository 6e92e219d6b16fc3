//! HTTP/JSON server for the coordinator's control plane: routes each
//! request to its handler and serves until shut down. The coordinator
//! itself has no `/shutdown` endpoint — that's a storage-node-only
//! affordance — so it instead stops on a process signal, wired up by
//! the binary that owns this server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, StatusCode};
use tokio::sync::watch;

use neofs_block::NodeClient;
use neofs_model::SharedCatalog;
use neofs_util::error::Error;

use crate::handlers;

#[derive(Clone)]
pub struct ApiConfig {
	pub default_replication_factor: usize,
	pub block_size: usize,
}

struct AppState {
	catalog: SharedCatalog,
	client: NodeClient,
	config: ApiConfig,
}

/// Serve the coordinator API on `bind_addr` until `shutdown` fires.
pub async fn serve(
	bind_addr: SocketAddr,
	catalog: SharedCatalog,
	config: ApiConfig,
	mut shutdown: watch::Receiver<bool>,
) -> Result<(), Error> {
	let state = Arc::new(AppState {
		catalog,
		client: NodeClient::new(),
		config,
	});

	let make_svc = make_service_fn(move |_conn| {
		let state = state.clone();
		async move {
			Ok::<_, Infallible>(service_fn(move |req| {
				let state = state.clone();
				async move { Ok::<_, Infallible>(handle(req, state).await) }
			}))
		}
	});

	let server = hyper::Server::bind(&bind_addr).serve(make_svc);
	info!("Coordinator API listening on {}", bind_addr);

	let graceful = server.with_graceful_shutdown(async move {
		let _ = shutdown.changed().await;
		info!("Coordinator API shutting down");
	});

	graceful.await?;
	Ok(())
}

async fn handle(req: Request<Body>, state: Arc<AppState>) -> Response<Body> {
	match route(req, state).await {
		Ok(resp) => resp,
		Err(e) => {
			warn!("coordinator request failed: {}", e);
			let mut resp = Response::new(Body::from(format!("{}\n", e)));
			*resp.status_mut() = e.http_status_code();
			resp
		}
	}
}

async fn route(req: Request<Body>, state: Arc<AppState>) -> Result<Response<Body>, Error> {
	match (req.method(), req.uri().path()) {
		(&Method::GET, "/status") => handlers::status(&state.catalog).await,
		(&Method::POST, "/heartbeat") => handlers::heartbeat(req, &state.catalog).await,
		(&Method::POST, "/client_heartbeat") => handlers::client_heartbeat(req, &state.catalog).await,
		(&Method::POST, "/upload") => {
			handlers::upload(
				req,
				&state.catalog,
				state.config.default_replication_factor,
				state.config.block_size,
			)
			.await
		}
		(&Method::POST, "/locate") => handlers::locate(req, &state.catalog).await,
		(&Method::POST, "/delete") => handlers::delete(req, &state.catalog, &state.client).await,
		(&Method::GET, "/list") => handlers::list(&state.catalog).await,
		_ => Ok(Response::builder()
			.status(StatusCode::NOT_FOUND)
			.body(Body::from("not found"))?),
	}
}
