// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tracing::instrument;
use treadle_scheduler::{JobError, JobExecutionContext, JobHandler};

/// Default retention for scratch files.
pub const DEFAULT_SCRATCH_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Deletes stale files from the scratch directory.
pub struct ScratchSweepJob {
	scratch_dir: PathBuf,
	max_age: Duration,
}

impl ScratchSweepJob {
	pub fn new(scratch_dir: PathBuf, max_age: Duration) -> Self {
		Self {
			scratch_dir,
			max_age,
		}
	}
}

#[async_trait]
impl JobHandler for ScratchSweepJob {
	#[instrument(skip(self, ctx), fields(job_type = "scratch-sweep"))]
	async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobError> {
		if ctx.cancellation.is_cancelled() {
			return Err(JobError::Cancelled);
		}

		if !self.scratch_dir.exists() {
			tracing::debug!(
				trace_id = %ctx.trace_id,
				dir = %self.scratch_dir.display(),
				"scratch directory absent, nothing to sweep"
			);
			return Ok(());
		}

		let mut entries = tokio::fs::read_dir(&self.scratch_dir)
			.await
			.map_err(|e| JobError::failed(format!("reading scratch directory: {e}")))?;

		let mut removed = 0u64;
		let mut kept = 0u64;

		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| JobError::failed(format!("listing scratch directory: {e}")))?
		{
			if ctx.cancellation.is_cancelled() {
				return Err(JobError::Cancelled);
			}

			let metadata = match entry.metadata().await {
				Ok(metadata) => metadata,
				Err(e) => {
					tracing::warn!(
						path = %entry.path().display(),
						error = %e,
						"skipping unreadable scratch entry"
					);
					continue;
				}
			};
			if !metadata.is_file() {
				continue;
			}

			let age = metadata
				.modified()
				.ok()
				.and_then(|modified| SystemTime::now().duration_since(modified).ok())
				.unwrap_or_default();

			if age >= self.max_age {
				match tokio::fs::remove_file(entry.path()).await {
					Ok(()) => removed += 1,
					Err(e) => tracing::warn!(
						path = %entry.path().display(),
						error = %e,
						"failed to remove stale scratch file"
					),
				}
			} else {
				kept += 1;
			}
		}

		tracing::info!(
			trace_id = %ctx.trace_id,
			dir = %self.scratch_dir.display(),
			removed,
			kept,
			"scratch sweep completed"
		);

		Ok(())
	}
}
