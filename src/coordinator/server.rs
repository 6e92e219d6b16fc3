use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;

use neofs_util::background::BackgroundRunner;
use neofs_util::config::read_coordinator_config;
use neofs_util::error::Error;

use neofs_api::ApiConfig;
use neofs_heal::HealWorker;
use neofs_model::{Catalog, LivenessWorker};

pub async fn run(config_file: PathBuf) -> Result<(), Error> {
	info!("Loading coordinator configuration from {:?}...", config_file);
	let config = read_coordinator_config(&config_file)?;

	info!("Initializing catalog with roster {:?}...", config.roster_endpoints());
	let catalog = Catalog::new(&config.roster_endpoints());

	info!("Initializing background runner...");
	let watch_cancel = watch_shutdown_signal();
	let (background, await_background_done) = BackgroundRunner::new(2, watch_cancel.clone());

	let sweep_interval = Duration::from_secs(config.sweep_interval_secs);

	background.spawn_worker(LivenessWorker::new(
		catalog.clone(),
		sweep_interval,
		Duration::from_secs(config.node_timeout_secs),
		Duration::from_secs(config.client_timeout_secs),
	));
	background.spawn_worker(HealWorker::new(catalog.clone(), sweep_interval));

	info!("Launching coordinator API on {}...", config.bind_addr);
	let api_config = ApiConfig {
		default_replication_factor: config.replication_factor,
		block_size: config.block_size,
	};
	neofs_api::serve(config.bind_addr, catalog.clone(), api_config, watch_cancel).await?;

	drop(catalog);
	await_background_done.await?;
	info!("Coordinator shut down cleanly.");

	Ok(())
}

#[cfg(unix)]
fn watch_shutdown_signal() -> watch::Receiver<bool> {
	use tokio::signal::unix::*;

	let (send_cancel, watch_cancel) = watch::channel(false);
	tokio::spawn(async move {
		let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
		let mut sigterm =
			signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
		let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");
		tokio::select! {
			_ = sigint.recv() => info!("Received SIGINT, shutting down."),
			_ = sigterm.recv() => info!("Received SIGTERM, shutting down."),
			_ = sighup.recv() => info!("Received SIGHUP, shutting down."),
		}
		let _ = send_cancel.send(true);
	});
	watch_cancel
}

#[cfg(windows)]
fn watch_shutdown_signal() -> watch::Receiver<bool> {
	use tokio::signal::windows::*;

	let (send_cancel, watch_cancel) = watch::channel(false);
	tokio::spawn(async move {
		let mut sigint = ctrl_c().expect("failed to install Ctrl-C handler");
		let mut sigclose = ctrl_close().expect("failed to install Ctrl-Close handler");
		tokio::select! {
			_ = sigint.recv() => info!("Received Ctrl-C, shutting down."),
			_ = sigclose.recv() => info!("Received Ctrl-Close, shutting down."),
		}
		let _ = send_cancel.send(true);
	});
	watch_cancel
}
