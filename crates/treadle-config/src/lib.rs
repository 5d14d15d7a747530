// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Treadle.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with clamped values
//! - Consistent environment variable naming (`TREADLE_*`)
//!
//! # Usage
//!
//! ```ignore
//! use treadle_config::load_config;
//!
//! let config = load_config()?;
//! println!("schedule: {}", config.scheduler.cron);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
	pub scheduler: SchedulerConfig,
	pub logging: LoggingConfig,
	pub paths: PathsConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TREADLE_*`)
/// 2. Config file (`/etc/treadle/treadle.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<Config, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<Config, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<Config, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ConfigLayer) -> Result<Config, ConfigError> {
	let scheduler = layer.scheduler.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let paths = layer.paths.unwrap_or_default().finalize();

	info!(
		cron = %scheduler.cron,
		job_type = %scheduler.job_type,
		lock_single_instance = scheduler.lock_single_instance,
		poll_interval_secs = scheduler.poll_interval_secs,
		log_level = %logging.level,
		"configuration loaded"
	);

	Ok(Config {
		scheduler,
		logging,
		paths,
	})
}
