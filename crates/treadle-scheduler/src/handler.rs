// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::context::JobExecutionContext;
use crate::error::JobError;

/// One firing of a scheduled job.
///
/// A fresh handler instance is resolved for every firing and dropped when
/// `execute` returns, so per-invocation collaborators never leak state
/// between firings.
///
/// Cancellation is cooperative: implementations should check
/// `ctx.cancellation` at their own suspension points and return
/// [`JobError::Cancelled`] when it fires. A handler that ignores the token
/// delays shutdown until it returns.
#[async_trait]
pub trait JobHandler: Send + Sync {
	async fn execute(&self, ctx: &JobExecutionContext) -> Result<(), JobError>;
}
