// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings snapshots and the store that publishes them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::signal::{ChangeListener, ChangeSignal};

/// Minimum polling granularity between due-time checks.
pub const MIN_POLL_INTERVAL_SECS: u64 = 1;

/// Immutable settings snapshot for the scheduled job.
///
/// A snapshot is created once and replaced, never mutated; exactly one
/// snapshot is current at any instant. Each scheduling generation is bound
/// to the snapshot that was current when it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSettings {
	/// Cron schedule expression. Empty or unparsable parks the scheduler.
	pub cron: String,
	/// Serialize overlapping due-ticks within a generation.
	pub lock_single_instance: bool,
	/// Polling granularity between due-time checks, clamped to at least 1.
	pub poll_interval_secs: u64,
	/// Handler-registry key and log correlation label.
	pub job_type: String,
}

impl JobSettings {
	pub fn new(
		cron: impl Into<String>,
		lock_single_instance: bool,
		poll_interval_secs: u64,
		job_type: impl Into<String>,
	) -> Self {
		Self {
			cron: cron.into(),
			lock_single_instance,
			poll_interval_secs: poll_interval_secs.max(MIN_POLL_INTERVAL_SECS),
			job_type: job_type.into(),
		}
	}

	/// Polling interval as a duration, clamped to the minimum granularity.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval_secs.max(MIN_POLL_INTERVAL_SECS))
	}
}

/// Holds the current [`JobSettings`] snapshot and notifies on replacement.
///
/// The snapshot pointer and the change signal are the only state shared
/// across logical flows; both are written only inside a narrow lock.
pub struct SettingsStore {
	current: Mutex<Arc<JobSettings>>,
	signal: ChangeSignal,
}

impl SettingsStore {
	pub fn new(initial: JobSettings) -> Self {
		Self {
			current: Mutex::new(Arc::new(initial)),
			signal: ChangeSignal::new(),
		}
	}

	/// The snapshot that is current right now.
	pub fn current(&self) -> Arc<JobSettings> {
		Arc::clone(&self.current.lock().unwrap())
	}

	/// Replace the current snapshot, then fire the change signal exactly once.
	pub fn publish(&self, next: JobSettings) {
		{
			let mut current = self.current.lock().unwrap();
			*current = Arc::new(next);
		}
		self.signal.notify();
	}

	/// Listener that completes on the next snapshot replacement.
	///
	/// Subscribe *before* reading [`current`](Self::current) to guarantee a
	/// publish between the read and the wait is observed.
	pub fn subscribe(&self) -> ChangeListener {
		self.signal.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration as StdDuration;

	#[test]
	fn test_poll_interval_clamped_to_minimum() {
		let settings = JobSettings::new("* * * * * *", false, 0, "demo");
		assert_eq!(settings.poll_interval_secs, 1);
		assert_eq!(settings.poll_interval(), StdDuration::from_secs(1));
	}

	#[test]
	fn test_poll_interval_preserved_above_minimum() {
		let settings = JobSettings::new("* * * * * *", false, 30, "demo");
		assert_eq!(settings.poll_interval(), StdDuration::from_secs(30));
	}

	#[test]
	fn test_publish_replaces_snapshot() {
		let store = SettingsStore::new(JobSettings::new("", false, 1, "demo"));
		let before = store.current();

		store.publish(JobSettings::new("*/5 * * * * *", true, 2, "demo"));

		let after = store.current();
		assert_eq!(before.cron, "");
		assert_eq!(after.cron, "*/5 * * * * *");
		assert!(after.lock_single_instance);
	}

	#[tokio::test]
	async fn test_subscribe_then_read_observes_publish() {
		let store = SettingsStore::new(JobSettings::new("", false, 1, "demo"));

		let mut listener = store.subscribe();
		let _snapshot = store.current();

		store.publish(JobSettings::new("* * * * * *", false, 1, "demo"));

		tokio::time::timeout(StdDuration::from_secs(1), listener.changed())
			.await
			.expect("publish should wake the listener");
		assert_eq!(store.current().cron, "* * * * * *");
	}

	#[test]
	fn test_old_snapshot_remains_readable_after_publish() {
		let store = SettingsStore::new(JobSettings::new("* * * * * *", false, 1, "demo"));
		let held = store.current();

		store.publish(JobSettings::new("*/2 * * * * *", false, 1, "demo"));

		// A generation bound to the old snapshot keeps reading its own copy.
		assert_eq!(held.cron, "* * * * * *");
	}
}
