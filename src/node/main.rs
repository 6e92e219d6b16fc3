//! Storage node binary (spec §4.1): serves the block protocol
//! (`PutBlock`/`GetBlock`/`DeleteBlock`/`Shutdown`) and emits a
//! heartbeat to the coordinator every `heartbeat_period_secs` (spec §6:
//! "Heartbeat(endpoint) sent to the coordinator every 1 s").
#[macro_use]
extern crate tracing;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use structopt::StructOpt;

use neofs_block::{server, BlockStore};
use neofs_util::config::read_node_config;

#[derive(StructOpt, Debug)]
#[structopt(
	name = "neofs-node",
	about = "NeoFS storage node: block store and heartbeat emitter"
)]
struct Opt {
	/// Path to the storage node configuration file.
	#[structopt(short = "c", long = "config", default_value = "./node.json")]
	config_file: PathBuf,
}

#[tokio::main]
async fn main() {
	if std::env::var("RUST_LOG").is_err() {
		std::env::set_var("RUST_LOG", "neofs_node=info,neofs_block=info");
	}
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
		.init();

	let opt = Opt::from_args();

	if let Err(e) = run(opt.config_file).await {
		error!("Fatal error: {}", e);
		std::process::exit(1);
	}
}

async fn run(config_file: PathBuf) -> Result<(), neofs_util::error::Error> {
	info!("Loading storage node configuration from {:?}...", config_file);
	let config = read_node_config(&config_file)?;

	let store = Arc::new(BlockStore::new(config.data_dir.clone()));
	store.init().await?;

	let endpoint = config.bind_addr.to_string();
	let heartbeat_period = Duration::from_secs(config.heartbeat_period_secs);
	let coordinator_addr = config.coordinator_addr.clone();

	info!(
		"Starting heartbeat emitter to {} every {:?} as {}...",
		coordinator_addr, heartbeat_period, endpoint
	);
	let heartbeat_task = tokio::spawn(heartbeat_loop(
		coordinator_addr,
		endpoint,
		heartbeat_period,
	));

	info!("Starting block protocol server on {}...", config.bind_addr);
	let result = server::serve(config.bind_addr, store).await;

	// Shutdown is cooperative: once the protocol server returns (either
	// from POST /shutdown or a fatal bind error) the heartbeat loop has
	// no further reason to run (spec §4.1: "the heartbeat loop exits and
	// the process ends").
	heartbeat_task.abort();

	result
}

/// Emit Heartbeat(endpoint) to the coordinator on a fixed period.
/// Failure to reach the coordinator is silently ignored — the node
/// keeps serving regardless (spec §4.1).
async fn heartbeat_loop(coordinator_addr: String, endpoint: String, period: Duration) {
	let client = neofs_util::coordinator_client::CoordinatorClient::new(coordinator_addr);
	loop {
		if let Err(e) = client.heartbeat(&endpoint).await {
			debug!("heartbeat to coordinator failed (ignored): {}", e);
		}
		tokio::time::sleep(period).await;
	}
}
