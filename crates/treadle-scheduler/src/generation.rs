// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One scheduling generation: the execution loop bound to a single settings
//! snapshot and cancellation scope.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::context::JobExecutionContext;
use crate::error::{JobError, Result, SchedulerError};
use crate::registry::HandlerRegistry;
use crate::schedule;
use crate::settings::JobSettings;

pub(crate) struct Generation {
	settings: Arc<JobSettings>,
	registry: Arc<HandlerRegistry>,
	token: CancellationToken,
}

impl Generation {
	pub(crate) fn new(
		settings: Arc<JobSettings>,
		registry: Arc<HandlerRegistry>,
		token: CancellationToken,
	) -> Self {
		Self {
			settings,
			registry,
			token,
		}
	}

	/// Drive the schedule until the cancellation scope fires.
	///
	/// Returns early (without error) once the schedule has no further
	/// occurrence, and with an error when the schedule is unusable or the
	/// job type has no registered handler. Either way the supervisor treats
	/// an uncancelled return as "completed unexpectedly" and parks.
	pub(crate) async fn run(self) -> Result<()> {
		let schedule = match schedule::parse(&self.settings.cron) {
			Ok(schedule) => schedule,
			Err(e) => {
				warn!(
					job_type = %self.settings.job_type,
					cron = %self.settings.cron,
					error = %e,
					"generation has no usable schedule"
				);
				return Err(e);
			}
		};

		// Single-instance gate: a due tick blocks on this until the previous
		// invocation releases it.
		let gate = self
			.settings
			.lock_single_instance
			.then(|| Arc::new(Mutex::new(())));

		let mut inflight: JoinSet<()> = JoinSet::new();
		let mut next_run = schedule::next_occurrence(&schedule, Utc::now());
		debug!(
			job_type = %self.settings.job_type,
			next_run = ?next_run,
			poll_interval_secs = self.settings.poll_interval_secs,
			"generation started"
		);

		let outcome = loop {
			if self.token.is_cancelled() {
				break Ok(());
			}

			reap_finished(&mut inflight, &self.settings.job_type);

			let due = match next_run {
				Some(at) => Utc::now() >= at,
				None => {
					warn!(
						job_type = %self.settings.job_type,
						cron = %self.settings.cron,
						"schedule has no further occurrence"
					);
					break Ok(());
				}
			};

			if due {
				let permit = match &gate {
					Some(gate) => {
						tokio::select! {
							guard = Arc::clone(gate).lock_owned() => Some(guard),
							_ = self.token.cancelled() => break Ok(()),
						}
					}
					None => None,
				};

				let Some(handler) = self.registry.resolve(&self.settings.job_type) else {
					error!(
						job_type = %self.settings.job_type,
						"no handler registered for job type"
					);
					break Err(SchedulerError::HandlerMissing(self.settings.job_type.clone()));
				};

				let ctx =
					JobExecutionContext::new(Arc::clone(&self.settings), self.token.clone());
				inflight.spawn(invoke(handler, ctx, permit));

				next_run = schedule::next_occurrence(&schedule, Utc::now());
			}

			tokio::select! {
				_ = tokio::time::sleep(self.settings.poll_interval()) => {}
				_ = self.token.cancelled() => break Ok(()),
			}
		};

		// Invocations already in flight are never aborted; the generation is
		// only done once every one of them has returned.
		while let Some(joined) = inflight.join_next().await {
			log_join_outcome(joined, &self.settings.job_type);
		}

		debug!(job_type = %self.settings.job_type, "generation finished");
		outcome
	}
}

/// Run a single handler invocation. The single-instance permit (when
/// present) is held until the handler returns, on every exit path.
async fn invoke(
	handler: Box<dyn crate::handler::JobHandler>,
	ctx: JobExecutionContext,
	permit: Option<OwnedMutexGuard<()>>,
) {
	let _permit = permit;

	debug!(
		trace_id = %ctx.trace_id,
		job_type = %ctx.settings.job_type,
		"invoking handler"
	);

	match handler.execute(&ctx).await {
		Ok(()) => {
			debug!(
				trace_id = %ctx.trace_id,
				job_type = %ctx.settings.job_type,
				"handler completed"
			);
		}
		Err(JobError::Cancelled) => {
			debug!(
				trace_id = %ctx.trace_id,
				job_type = %ctx.settings.job_type,
				"handler observed cancellation"
			);
		}
		Err(e) => {
			// Failure never stops the loop; the next occurrence is still
			// honored.
			error!(
				trace_id = %ctx.trace_id,
				job_type = %ctx.settings.job_type,
				error = %e,
				"handler failed"
			);
		}
	}
}

fn reap_finished(inflight: &mut JoinSet<()>, job_type: &str) {
	while let Some(joined) = inflight.try_join_next() {
		log_join_outcome(joined, job_type);
	}
}

fn log_join_outcome(joined: std::result::Result<(), tokio::task::JoinError>, job_type: &str) {
	if let Err(e) = joined {
		if e.is_panic() {
			error!(job_type = %job_type, "handler invocation panicked");
		}
	}
}
