// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use crate::handler::JobHandler;

type HandlerFactory = Box<dyn Fn() -> Box<dyn JobHandler> + Send + Sync>;

/// Maps a job-type label to a handler factory.
///
/// [`resolve`](Self::resolve) produces a fresh handler scoped to exactly one
/// firing; dropping the returned handler releases its per-invocation state on
/// every exit path, including handler failure and cancellation.
#[derive(Default)]
pub struct HandlerRegistry {
	factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self {
			factories: HashMap::new(),
		}
	}

	/// Register a factory for a job type. A later registration for the same
	/// job type replaces the earlier one.
	pub fn register<F, H>(&mut self, job_type: impl Into<String>, factory: F)
	where
		F: Fn() -> H + Send + Sync + 'static,
		H: JobHandler + 'static,
	{
		self.factories
			.insert(job_type.into(), Box::new(move || Box::new(factory())));
	}

	/// Produce a handler for one firing, or `None` when the job type is
	/// unknown.
	pub fn resolve(&self, job_type: &str) -> Option<Box<dyn JobHandler>> {
		self.factories.get(job_type).map(|factory| factory())
	}

	pub fn job_types(&self) -> Vec<String> {
		self.factories.keys().cloned().collect()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::JobExecutionContext;
	use crate::error::JobError;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	struct CountingHandler {
		instances: Arc<AtomicUsize>,
	}

	impl CountingHandler {
		fn new(instances: Arc<AtomicUsize>) -> Self {
			instances.fetch_add(1, Ordering::SeqCst);
			Self { instances }
		}
	}

	impl Drop for CountingHandler {
		fn drop(&mut self) {
			self.instances.fetch_sub(1, Ordering::SeqCst);
		}
	}

	#[async_trait]
	impl JobHandler for CountingHandler {
		async fn execute(&self, _ctx: &JobExecutionContext) -> Result<(), JobError> {
			Ok(())
		}
	}

	#[test]
	fn test_resolve_unknown_job_type() {
		let registry = HandlerRegistry::new();
		assert!(registry.resolve("missing").is_none());
		assert!(registry.is_empty());
	}

	#[test]
	fn test_resolve_produces_fresh_instance_per_firing() {
		let instances = Arc::new(AtomicUsize::new(0));
		let mut registry = HandlerRegistry::new();
		let counter = Arc::clone(&instances);
		registry.register("demo", move || CountingHandler::new(Arc::clone(&counter)));

		let first = registry.resolve("demo").unwrap();
		let second = registry.resolve("demo").unwrap();
		assert_eq!(instances.load(Ordering::SeqCst), 2);

		// Dropping the handler releases its per-invocation scope.
		drop(first);
		drop(second);
		assert_eq!(instances.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_later_registration_replaces_earlier() {
		let instances = Arc::new(AtomicUsize::new(0));
		let mut registry = HandlerRegistry::new();
		let counter = Arc::clone(&instances);
		registry.register("demo", move || CountingHandler::new(Arc::clone(&counter)));
		let counter = Arc::clone(&instances);
		registry.register("demo", move || CountingHandler::new(Arc::clone(&counter)));

		assert_eq!(registry.job_types(), vec!["demo".to_string()]);
	}
}
