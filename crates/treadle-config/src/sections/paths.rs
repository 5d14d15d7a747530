// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem paths configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathsConfigLayer {
	pub data_dir: Option<String>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.data_dir.is_some() {
			self.data_dir = other.data_dir;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			data_dir: self.data_dir.unwrap_or_else(|| "/var/lib/treadle".to_string()),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
	pub data_dir: String,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			data_dir: "/var/lib/treadle".to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_data_dir() {
		assert_eq!(PathsConfig::default().data_dir, "/var/lib/treadle");
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = PathsConfigLayer { data_dir: None };
		base.merge(PathsConfigLayer {
			data_dir: Some("/tmp/treadle".to_string()),
		});
		assert_eq!(base.finalize().data_dir, "/tmp/treadle");
	}
}
