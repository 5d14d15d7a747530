// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Treadle scheduler daemon binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use treadle_config::{Config, ConfigError, SchedulerConfig};
use treadle_scheduler::{HandlerRegistry, JobSettings, SchedulerSupervisor, SettingsStore};

mod jobs;
mod signal;
mod version;

use signal::{ServerSignal, SignalListener};

/// Treadle - dynamic cron-driven job scheduler daemon.
#[derive(Parser, Debug)]
#[command(
	name = "treadle-server",
	about = "Treadle job scheduler daemon",
	version
)]
struct Args {
	/// Path to the TOML configuration file.
	#[arg(long, env = "TREADLE_CONFIG")]
	config: Option<PathBuf>,

	/// Subcommands for treadle-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn load_config(args: &Args) -> Result<Config, ConfigError> {
	match &args.config {
		Some(path) => treadle_config::load_config_with_file(path),
		None => treadle_config::load_config(),
	}
}

fn job_settings(scheduler: &SchedulerConfig) -> JobSettings {
	JobSettings::new(
		scheduler.cron.clone(),
		scheduler.lock_single_instance,
		scheduler.poll_interval_secs,
		scheduler.job_type.clone(),
	)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the daemon
	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = load_config(&args)?;

	// Setup tracing
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		cron = %config.scheduler.cron,
		job_type = %config.scheduler.job_type,
		"starting treadle-server"
	);

	// Register built-in handlers
	let started = Instant::now();
	let scratch_dir = PathBuf::from(&config.paths.data_dir).join("scratch");

	let mut registry = HandlerRegistry::new();
	registry.register("heartbeat", move || jobs::HeartbeatJob::new(started));
	{
		let scratch_dir = scratch_dir.clone();
		registry.register("scratch-sweep", move || {
			jobs::ScratchSweepJob::new(scratch_dir.clone(), jobs::DEFAULT_SCRATCH_MAX_AGE)
		});
	}

	// Publish the initial settings snapshot and start the supervisor
	let store = Arc::new(SettingsStore::new(job_settings(&config.scheduler)));
	let supervisor = SchedulerSupervisor::new(Arc::clone(&store), Arc::new(registry));
	supervisor.start().await?;

	// Drive the daemon from lifecycle signals
	let mut signals = SignalListener::new()?;
	loop {
		match signals.recv().await {
			ServerSignal::Shutdown => {
				tracing::info!("received shutdown signal");
				break;
			}
			ServerSignal::Reload => {
				tracing::info!("received reload signal, reloading configuration");
				match load_config(&args) {
					Ok(reloaded) => store.publish(job_settings(&reloaded.scheduler)),
					Err(e) => tracing::error!(
						error = %e,
						"configuration reload failed, keeping current settings"
					),
				}
			}
		}
	}

	tracing::info!("shutting down scheduler...");
	supervisor.stop().await;

	tracing::info!("server shutdown complete");
	Ok(())
}
