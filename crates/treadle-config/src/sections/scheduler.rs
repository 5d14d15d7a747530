// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scheduler configuration section.

use serde::{Deserialize, Serialize};

/// Minimum polling granularity; lower values are clamped on finalize.
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfigLayer {
	pub cron: Option<String>,
	pub lock_single_instance: Option<bool>,
	pub poll_interval_secs: Option<u64>,
	pub job_type: Option<String>,
}

impl SchedulerConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.cron.is_some() {
			self.cron = other.cron;
		}
		if other.lock_single_instance.is_some() {
			self.lock_single_instance = other.lock_single_instance;
		}
		if other.poll_interval_secs.is_some() {
			self.poll_interval_secs = other.poll_interval_secs;
		}
		if other.job_type.is_some() {
			self.job_type = other.job_type;
		}
	}

	pub fn finalize(self) -> SchedulerConfig {
		SchedulerConfig {
			cron: self.cron.unwrap_or_default(),
			lock_single_instance: self.lock_single_instance.unwrap_or(false),
			poll_interval_secs: self
				.poll_interval_secs
				.unwrap_or(MIN_POLL_INTERVAL_SECS)
				.max(MIN_POLL_INTERVAL_SECS),
			job_type: self.job_type.unwrap_or_else(|| "heartbeat".to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchedulerConfig {
	/// Cron schedule expression. Empty keeps the scheduler parked.
	pub cron: String,
	pub lock_single_instance: bool,
	pub poll_interval_secs: u64,
	pub job_type: String,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			cron: String::new(),
			lock_single_instance: false,
			poll_interval_secs: MIN_POLL_INTERVAL_SECS,
			job_type: "heartbeat".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = SchedulerConfig::default();
		assert!(config.cron.is_empty());
		assert!(!config.lock_single_instance);
		assert_eq!(config.poll_interval_secs, 1);
		assert_eq!(config.job_type, "heartbeat");
	}

	#[test]
	fn test_layer_finalize_defaults() {
		let layer = SchedulerConfigLayer::default();
		let config = layer.finalize();
		assert_eq!(config, SchedulerConfig::default());
	}

	#[test]
	fn test_finalize_clamps_poll_interval() {
		let layer = SchedulerConfigLayer {
			poll_interval_secs: Some(0),
			..Default::default()
		};
		let config = layer.finalize();
		assert_eq!(config.poll_interval_secs, MIN_POLL_INTERVAL_SECS);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = SchedulerConfigLayer {
			cron: Some("0 0 * * * *".to_string()),
			lock_single_instance: Some(false),
			poll_interval_secs: Some(5),
			job_type: None,
		};
		let overlay = SchedulerConfigLayer {
			cron: Some("*/30 * * * * *".to_string()),
			lock_single_instance: None,
			poll_interval_secs: Some(2),
			job_type: Some("sweep".to_string()),
		};
		base.merge(overlay);
		assert_eq!(base.cron.as_deref(), Some("*/30 * * * * *"));
		assert_eq!(base.lock_single_instance, Some(false));
		assert_eq!(base.poll_interval_secs, Some(2));
		assert_eq!(base.job_type.as_deref(), Some("sweep"));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let toml_str = r#"
cron = "*/15 * * * * *"
"#;
		let layer: SchedulerConfigLayer = toml::from_str(toml_str).unwrap();
		assert_eq!(layer.cron.as_deref(), Some("*/15 * * * * *"));
		assert!(layer.lock_single_instance.is_none());
		assert!(layer.poll_interval_secs.is_none());
	}

	#[test]
	fn test_serde_roundtrip() {
		let config = SchedulerConfig {
			cron: "0 */5 * * * *".to_string(),
			lock_single_instance: true,
			poll_interval_secs: 3,
			job_type: "sweep".to_string(),
		};
		let toml_str = toml::to_string(&config).unwrap();
		let parsed: SchedulerConfig = toml::from_str(&toml_str).unwrap();
		assert_eq!(config, parsed);
	}
}
