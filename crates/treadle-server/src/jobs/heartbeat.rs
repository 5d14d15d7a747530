// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Instant;

use async_trait::async_trait;
use tracing::instrument;
use treadle_scheduler::{JobError, JobExecutionContext, JobHandler};

/// Emits a liveness event on every firing.
pub struct HeartbeatJob {
	started: Instant,
}

impl HeartbeatJob {
	pub fn new(started: Instant) -> Self {
		Self { started }
	}
}

#[async_trait]
impl JobHandler for HeartbeatJob {
	#[instrument(skip(self, ctx), fields(job_type = "heartbeat"))]
	async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobError> {
		if ctx.cancellation.is_cancelled() {
			return Err(JobError::Cancelled);
		}

		tracing::info!(
			trace_id = %ctx.trace_id,
			uptime_secs = self.started.elapsed().as_secs(),
			"heartbeat"
		);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use tokio_util::sync::CancellationToken;
	use treadle_scheduler::JobSettings;

	fn context(token: CancellationToken) -> JobExecutionContext {
		JobExecutionContext {
			trace_id: "test-trace".to_string(),
			settings: Arc::new(JobSettings::new("* * * * * *", false, 1, "heartbeat")),
			cancellation: token,
		}
	}

	#[tokio::test]
	async fn test_heartbeat_succeeds() {
		let job = HeartbeatJob::new(Instant::now());
		let result = job.execute(&context(CancellationToken::new())).await;
		assert!(result.is_ok());
	}

	#[tokio::test]
	async fn test_heartbeat_observes_cancellation() {
		let token = CancellationToken::new();
		token.cancel();

		let job = HeartbeatJob::new(Instant::now());
		let result = job.execute(&context(token)).await;
		assert!(matches!(result, Err(JobError::Cancelled)));
	}
}
