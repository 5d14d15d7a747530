// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The top-level configuration layer merged across sources.

use serde::{Deserialize, Serialize};

use crate::sections::{LoggingConfigLayer, PathsConfigLayer, SchedulerConfigLayer};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigLayer {
	pub scheduler: Option<SchedulerConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
	pub paths: Option<PathsConfigLayer>,
}

impl ConfigLayer {
	/// Merge `other` over `self`, field by field within each section.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.scheduler, other.scheduler, SchedulerConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.paths, other.paths, PathsConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: impl Fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		_ => {}
	}
}
