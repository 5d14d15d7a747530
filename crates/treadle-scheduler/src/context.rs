// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::settings::JobSettings;

/// Per-firing execution context handed to a handler.
///
/// Created immediately before the invocation and discarded after it returns;
/// never retained across firings. The cancellation token is the owning
/// generation's scope: handlers must observe it cooperatively, the scheduler
/// never aborts a running invocation.
pub struct JobExecutionContext {
	/// Correlation identifier for this single firing.
	pub trace_id: String,
	/// The settings snapshot the owning generation is bound to.
	pub settings: Arc<JobSettings>,
	/// Cancellation scope of the owning generation.
	pub cancellation: CancellationToken,
}

impl JobExecutionContext {
	pub(crate) fn new(settings: Arc<JobSettings>, cancellation: CancellationToken) -> Self {
		Self {
			trace_id: uuid::Uuid::new_v4().to_string(),
			settings,
			cancellation,
		}
	}
}
