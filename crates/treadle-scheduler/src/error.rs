// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
	#[error("cron expression is empty")]
	EmptySchedule,

	#[error("invalid cron expression '{expression}': {message}")]
	InvalidSchedule { expression: String, message: String },

	#[error("no handler registered for job type '{0}'")]
	HandlerMissing(String),

	#[error("scheduler already started")]
	AlreadyStarted,
}

/// Error returned by a handler invocation.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
	#[error("job failed: {message}")]
	Failed { message: String },

	#[error("job cancelled")]
	Cancelled,
}

impl JobError {
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed {
			message: message.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
