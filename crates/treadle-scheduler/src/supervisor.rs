// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The outer control loop: owns the run state and reacts to generation
//! completion, settings changes, and shutdown.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{Result, SchedulerError};
use crate::generation::Generation;
use crate::registry::HandlerRegistry;
use crate::schedule;
use crate::settings::SettingsStore;

/// Supervises scheduling generations for one settings store.
///
/// At most one generation is active at a time: on a settings change or
/// shutdown the supervisor cancels the active generation and fully awaits it
/// before starting the next one, so two schedules can never fire
/// concurrently. When the current snapshot has no usable schedule the
/// supervisor parks until the next change.
///
/// Nothing escapes to the host: a generation that fails is logged and the
/// supervisor parks; a failure of the supervision task itself is logged as
/// fatal and leaves the supervisor permanently inert.
pub struct SchedulerSupervisor {
	store: Arc<SettingsStore>,
	registry: Arc<HandlerRegistry>,
	shutdown: CancellationToken,
	lifetime_id: String,
	task: Mutex<Option<JoinHandle<()>>>,
}

impl SchedulerSupervisor {
	pub fn new(store: Arc<SettingsStore>, registry: Arc<HandlerRegistry>) -> Self {
		Self {
			store,
			registry,
			shutdown: CancellationToken::new(),
			lifetime_id: uuid::Uuid::new_v4().to_string(),
			task: Mutex::new(None),
		}
	}

	/// Identifier correlating all generations of this supervisor in logs.
	pub fn lifetime_id(&self) -> &str {
		&self.lifetime_id
	}

	/// Spawn the supervision loop as a background task.
	pub async fn start(&self) -> Result<()> {
		let mut slot = self.task.lock().await;
		if slot.is_some() {
			return Err(SchedulerError::AlreadyStarted);
		}

		let supervision = SupervisionLoop {
			store: Arc::clone(&self.store),
			registry: Arc::clone(&self.registry),
			shutdown: self.shutdown.clone(),
			lifetime_id: self.lifetime_id.clone(),
		};

		info!(lifetime_id = %self.lifetime_id, "scheduler supervisor started");

		// The loop runs in its own task so that a failure is contained
		// there: the host keeps running and the supervisor goes inert.
		let lifetime_id = self.lifetime_id.clone();
		*slot = Some(tokio::spawn(async move {
			let supervision = tokio::spawn(supervision.run());
			if let Err(e) = supervision.await {
				error!(
					lifetime_id = %lifetime_id,
					error = %e,
					fatal = true,
					"supervision loop failed, scheduler is now inert"
				);
			}
		}));
		Ok(())
	}

	/// Cancel the active generation and block until the supervisor is
	/// quiescent. Safe to call more than once.
	pub async fn stop(&self) {
		self.shutdown.cancel();

		let handle = self.task.lock().await.take();
		if let Some(handle) = handle {
			if let Err(e) = handle.await {
				// Supervision task died on its own; it is inert from here on.
				error!(
					lifetime_id = %self.lifetime_id,
					error = %e,
					"supervisor task did not shut down cleanly"
				);
			}
		}
	}
}

struct SupervisionLoop {
	store: Arc<SettingsStore>,
	registry: Arc<HandlerRegistry>,
	shutdown: CancellationToken,
	lifetime_id: String,
}

impl SupervisionLoop {
	async fn run(self) {
		loop {
			if self.shutdown.is_cancelled() {
				break;
			}

			// Subscribe before reading the snapshot so a publish landing
			// in between is still observed.
			let mut listener = self.store.subscribe();
			let settings = self.store.current();

			match schedule::parse(&settings.cron) {
				Err(e) => {
					match e {
						SchedulerError::EmptySchedule => info!(
							lifetime_id = %self.lifetime_id,
							job_type = %settings.job_type,
							"scheduler parked, waiting for configuration"
						),
						_ => warn!(
							lifetime_id = %self.lifetime_id,
							job_type = %settings.job_type,
							cron = %settings.cron,
							error = %e,
							"scheduler parked, waiting for configuration"
						),
					}

					tokio::select! {
						_ = self.shutdown.cancelled() => break,
						_ = listener.changed() => {}
					}
				}
				Ok(_) => {
					let token = self.shutdown.child_token();
					let generation = Generation::new(
						Arc::clone(&settings),
						Arc::clone(&self.registry),
						token.clone(),
					);

					info!(
						lifetime_id = %self.lifetime_id,
						job_type = %settings.job_type,
						cron = %settings.cron,
						lock_single_instance = settings.lock_single_instance,
						"scheduler running"
					);

					let mut task = tokio::spawn(generation.run());

					tokio::select! {
						joined = &mut task => {
							match joined {
								Ok(Ok(())) => warn!(
									lifetime_id = %self.lifetime_id,
									job_type = %settings.job_type,
									"generation completed unexpectedly"
								),
								Ok(Err(e)) => warn!(
									lifetime_id = %self.lifetime_id,
									job_type = %settings.job_type,
									error = %e,
									"generation stopped"
								),
								Err(e) => error!(
									lifetime_id = %self.lifetime_id,
									job_type = %settings.job_type,
									error = %e,
									"generation task failed"
								),
							}

							// Park until the next settings change.
							tokio::select! {
								_ = self.shutdown.cancelled() => break,
								_ = listener.changed() => {}
							}
						}
						_ = listener.changed() => {
							info!(
								lifetime_id = %self.lifetime_id,
								job_type = %settings.job_type,
								"settings changed, restarting scheduler"
							);
							token.cancel();
							// The cancelled generation drains its in-flight
							// invocations before returning; its outcome is
							// the expected cancellation and is discarded.
							let _ = (&mut task).await;
						}
						_ = self.shutdown.cancelled() => {
							info!(
								lifetime_id = %self.lifetime_id,
								job_type = %settings.job_type,
								"scheduler stopping"
							);
							token.cancel();
							let _ = (&mut task).await;
							break;
						}
					}
				}
			}
		}

		info!(lifetime_id = %self.lifetime_id, "scheduler stopped");
	}
}
