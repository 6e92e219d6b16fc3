//! Coordinator binary: liveness tracking, the metadata catalog, the
//! re-replication engine and the HTTP/JSON control plane (spec §4.2,
//! §4.3, §4.4, §4.5).
#[macro_use]
extern crate tracing;

mod server;

use std::path::PathBuf;

use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
	name = "neofs-coordinator",
	about = "NeoFS coordinator: liveness tracking, metadata catalog and re-replication"
)]
struct Opt {
	/// Path to the coordinator configuration file (spec §6).
	#[structopt(short = "c", long = "config", default_value = "./coordinator.json")]
	config_file: PathBuf,
}

#[tokio::main]
async fn main() {
	if std::env::var("RUST_LOG").is_err() {
		std::env::set_var("RUST_LOG", "neofs_coordinator=info,neofs_api=info,neofs_model=info,neofs_heal=info");
	}
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
		.init();

	let opt = Opt::from_args();

	if let Err(e) = server::run(opt.config_file).await {
		error!("Fatal error: {}", e);
		std::process::exit(1);
	}
}
