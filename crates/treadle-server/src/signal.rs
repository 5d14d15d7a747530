// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lifecycle signal handling for the daemon.

/// Signal type for daemon control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerSignal {
	/// Graceful shutdown (SIGINT, SIGTERM).
	Shutdown,
	/// Reload configuration (SIGHUP).
	Reload,
}

impl std::fmt::Display for ServerSignal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ServerSignal::Shutdown => write!(f, "SHUTDOWN"),
			ServerSignal::Reload => write!(f, "RELOAD"),
		}
	}
}

/// Listener over the host's lifecycle signals.
pub struct SignalListener {
	#[cfg(unix)]
	hangup: tokio::signal::unix::Signal,
	#[cfg(unix)]
	terminate: tokio::signal::unix::Signal,
}

impl SignalListener {
	pub fn new() -> std::io::Result<Self> {
		#[cfg(unix)]
		{
			use tokio::signal::unix::{signal, SignalKind};
			Ok(Self {
				hangup: signal(SignalKind::hangup())?,
				terminate: signal(SignalKind::terminate())?,
			})
		}
		#[cfg(not(unix))]
		{
			Ok(Self {})
		}
	}

	/// Wait for the next lifecycle signal.
	pub async fn recv(&mut self) -> ServerSignal {
		#[cfg(unix)]
		{
			tokio::select! {
				_ = tokio::signal::ctrl_c() => ServerSignal::Shutdown,
				_ = self.terminate.recv() => ServerSignal::Shutdown,
				_ = self.hangup.recv() => ServerSignal::Reload,
			}
		}
		#[cfg(not(unix))]
		{
			let _ = tokio::signal::ctrl_c().await;
			ServerSignal::Shutdown
		}
	}
}
