// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-shot, replaceable change notification.

use std::sync::Mutex;

use tokio::sync::watch;

/// Fire-and-replace notification latch.
///
/// `notify` completes the current latch and installs a fresh unfired latch in
/// the same critical section. A change arriving before the previous one has
/// been observed is therefore never lost, no listener sees a latch fire
/// twice, and late subscribers only ever see the current unfired latch.
pub struct ChangeSignal {
	latch: Mutex<watch::Sender<bool>>,
}

impl ChangeSignal {
	pub fn new() -> Self {
		let (tx, _) = watch::channel(false);
		Self {
			latch: Mutex::new(tx),
		}
	}

	/// Obtain a listener on the current unfired latch.
	pub fn subscribe(&self) -> ChangeListener {
		let latch = self.latch.lock().unwrap();
		ChangeListener {
			rx: latch.subscribe(),
		}
	}

	/// Fire the current latch and atomically replace it with a fresh one.
	pub fn notify(&self) {
		let (tx, _) = watch::channel(false);
		let fired = {
			let mut latch = self.latch.lock().unwrap();
			std::mem::replace(&mut *latch, tx)
		};
		fired.send_replace(true);
	}
}

impl Default for ChangeSignal {
	fn default() -> Self {
		Self::new()
	}
}

/// Listener bound to the latch that was current at subscription time.
pub struct ChangeListener {
	rx: watch::Receiver<bool>,
}

impl ChangeListener {
	/// Completes once the subscribed latch has fired.
	///
	/// The latch retains its fired state, so a fire that lands between
	/// subscribing and awaiting is still observed.
	pub async fn changed(&mut self) {
		let _ = self.rx.wait_for(|fired| *fired).await;
	}

	/// Whether the subscribed latch has already fired.
	pub fn has_fired(&self) -> bool {
		*self.rx.borrow()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[tokio::test]
	async fn test_listener_observes_fire() {
		let signal = ChangeSignal::new();
		let mut listener = signal.subscribe();

		signal.notify();

		tokio::time::timeout(Duration::from_secs(1), listener.changed())
			.await
			.expect("listener should observe the fire");
	}

	#[tokio::test]
	async fn test_fire_before_await_is_not_lost() {
		let signal = ChangeSignal::new();
		let mut listener = signal.subscribe();

		// Fire lands before the listener polls.
		signal.notify();
		assert!(listener.has_fired());

		tokio::time::timeout(Duration::from_secs(1), listener.changed())
			.await
			.expect("retained fired state should complete the wait");
	}

	#[tokio::test]
	async fn test_late_subscriber_sees_unfired_latch() {
		let signal = ChangeSignal::new();
		signal.notify();

		// Subscribed after the fire: bound to the replacement latch.
		let listener = signal.subscribe();
		assert!(!listener.has_fired());
	}

	#[tokio::test]
	async fn test_rapid_consecutive_fires_are_not_conflated() {
		let signal = ChangeSignal::new();

		let first = signal.subscribe();
		signal.notify();
		let second = signal.subscribe();
		signal.notify();
		let third = signal.subscribe();

		assert!(first.has_fired());
		assert!(second.has_fired());
		assert!(!third.has_fired());
	}

	#[tokio::test]
	async fn test_concurrent_listeners_all_wake() {
		let signal = std::sync::Arc::new(ChangeSignal::new());

		let mut waiters = Vec::new();
		for _ in 0..4 {
			let mut listener = signal.subscribe();
			waiters.push(tokio::spawn(async move { listener.changed().await }));
		}

		signal.notify();

		for waiter in waiters {
			tokio::time::timeout(Duration::from_secs(1), waiter)
				.await
				.expect("waiter should wake")
				.expect("waiter task should not panic");
		}
	}
}
