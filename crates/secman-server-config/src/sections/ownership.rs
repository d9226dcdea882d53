// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership label configuration.
//!
//! Only the raw `key=value,...` text is carried here. Parsing happens where
//! the labels are resolved, at server start-up.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipConfig {
	/// Raw label override. `None` selects the built-in default pair.
	pub labels: Option<String>,
	/// Refuse to update or delete secrets that lack the ownership labels.
	pub strict: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnershipConfigLayer {
	#[serde(default)]
	pub labels: Option<String>,
	#[serde(default)]
	pub strict: Option<bool>,
}

impl OwnershipConfigLayer {
	pub fn merge(&mut self, other: OwnershipConfigLayer) {
		if other.labels.is_some() {
			self.labels = other.labels;
		}
		if other.strict.is_some() {
			self.strict = other.strict;
		}
	}

	pub fn finalize(self) -> OwnershipConfig {
		OwnershipConfig {
			labels: self.labels.filter(|l| !l.trim().is_empty()),
			strict: self.strict.unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_lenient_without_override() {
		let config = OwnershipConfigLayer::default().finalize();
		assert_eq!(config.labels, None);
		assert!(!config.strict);
	}

	#[test]
	fn test_blank_labels_are_unset() {
		let config = OwnershipConfigLayer {
			labels: Some("  ".to_string()),
			strict: None,
		}
		.finalize();
		assert_eq!(config.labels, None);
	}

	#[test]
	fn test_deserialize_from_toml() {
		let layer: OwnershipConfigLayer =
			toml::from_str("labels = \"team=payments,app=secman\"\nstrict = true").unwrap();
		let config = layer.finalize();
		assert_eq!(config.labels.as_deref(), Some("team=payments,app=secman"));
		assert!(config.strict);
	}
}
