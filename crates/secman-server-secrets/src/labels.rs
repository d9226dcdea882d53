// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership labels identifying secrets managed by this deployment.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

/// Label key asserted when no override is configured.
pub const DEFAULT_OWNERSHIP_LABEL_KEY: &str = "authorino.kuadrant.io/managed-by";

/// Label value asserted when no override is configured.
pub const DEFAULT_OWNERSHIP_LABEL_VALUE: &str = "authorino";

/// Result of leniently parsing a `key=value,key=value` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLabels {
	/// Well-formed pairs. Later duplicates of a key overwrite earlier ones.
	pub labels: BTreeMap<String, String>,
	/// Entries that were dropped: no `=`, an empty key, or a blank entry.
	pub skipped: usize,
}

/// Parse a comma-separated list of `key=value` pairs.
///
/// Each entry is split at the first `=`, so values may themselves contain
/// `=`. Keys and values are trimmed. Malformed entries are counted, never
/// reported as errors.
pub fn parse_label_pairs(raw: &str) -> ParsedLabels {
	let mut parsed = ParsedLabels::default();

	for entry in raw.split(',') {
		match entry.split_once('=') {
			Some((key, value)) if !key.trim().is_empty() => {
				parsed
					.labels
					.insert(key.trim().to_string(), value.trim().to_string());
			}
			_ => parsed.skipped += 1,
		}
	}

	parsed
}

/// The process-wide set of labels marking a secret as managed by secman.
///
/// Never empty. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipLabels {
	labels: BTreeMap<String, String>,
}

impl Default for OwnershipLabels {
	fn default() -> Self {
		Self {
			labels: BTreeMap::from([(
				DEFAULT_OWNERSHIP_LABEL_KEY.to_string(),
				DEFAULT_OWNERSHIP_LABEL_VALUE.to_string(),
			)]),
		}
	}
}

impl OwnershipLabels {
	/// Resolve the ownership labels from the configured override, if any.
	///
	/// Absent or blank configuration yields the default pair. If the override
	/// contains no well-formed pair at all, the default pair is used as well.
	pub fn resolve(raw: Option<&str>) -> Self {
		let raw = match raw.map(str::trim) {
			Some(raw) if !raw.is_empty() => raw,
			_ => {
				debug!("no ownership label override configured, using default");
				return Self::default();
			}
		};

		let parsed = parse_label_pairs(raw);
		if parsed.skipped > 0 {
			warn!(
				skipped = parsed.skipped,
				"ignoring malformed ownership label entries"
			);
		}

		match Self::from_labels(parsed.labels) {
			Some(labels) => labels,
			None => {
				warn!("ownership label override has no valid key=value pair, using default");
				Self::default()
			}
		}
	}

	/// Build from an explicit mapping. Returns `None` when the mapping is empty.
	pub fn from_labels(labels: BTreeMap<String, String>) -> Option<Self> {
		if labels.is_empty() {
			None
		} else {
			Some(Self { labels })
		}
	}

	pub fn as_map(&self) -> &BTreeMap<String, String> {
		&self.labels
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	/// Equality selector requiring every ownership pair, in key order.
	pub fn selector(&self) -> String {
		self
			.labels
			.iter()
			.map(|(k, v)| format!("{k}={v}"))
			.collect::<Vec<_>>()
			.join(",")
	}

	/// Merge the ownership pairs into `labels`, overwriting same-key values.
	pub fn apply(&self, labels: &mut BTreeMap<String, String>) {
		for (k, v) in &self.labels {
			labels.insert(k.clone(), v.clone());
		}
	}

	/// True when `labels` carries every ownership pair.
	pub fn is_owned(&self, labels: &BTreeMap<String, String>) -> bool {
		self
			.labels
			.iter()
			.all(|(k, v)| labels.get(k) == Some(v))
	}
}

impl fmt::Display for OwnershipLabels {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.selector())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_resolve_absent_uses_default() {
		let labels = OwnershipLabels::resolve(None);
		assert_eq!(
			labels.as_map(),
			&map(&[("authorino.kuadrant.io/managed-by", "authorino")])
		);
	}

	#[test]
	fn test_resolve_blank_uses_default() {
		assert_eq!(OwnershipLabels::resolve(Some("")), OwnershipLabels::default());
		assert_eq!(
			OwnershipLabels::resolve(Some("   ")),
			OwnershipLabels::default()
		);
	}

	#[test]
	fn test_resolve_override_replaces_default() {
		let labels = OwnershipLabels::resolve(Some("team=payments, app.kubernetes.io/managed-by = secman"));
		assert_eq!(
			labels.as_map(),
			&map(&[
				("app.kubernetes.io/managed-by", "secman"),
				("team", "payments")
			])
		);
	}

	#[test]
	fn test_resolve_all_malformed_falls_back_to_default() {
		let labels = OwnershipLabels::resolve(Some("nonsense,,also-bad"));
		assert_eq!(labels, OwnershipLabels::default());
	}

	#[test]
	fn test_parse_counts_skipped_entries() {
		let parsed = parse_label_pairs("a=1,broken,=novalue,b = 2 ,");
		assert_eq!(parsed.labels, map(&[("a", "1"), ("b", "2")]));
		assert_eq!(parsed.skipped, 3);
	}

	#[test]
	fn test_parse_splits_at_first_equals() {
		let parsed = parse_label_pairs("token=abc=def");
		assert_eq!(parsed.labels, map(&[("token", "abc=def")]));
		assert_eq!(parsed.skipped, 0);
	}

	#[test]
	fn test_parse_allows_empty_value() {
		let parsed = parse_label_pairs("flag=");
		assert_eq!(parsed.labels, map(&[("flag", "")]));
	}

	#[test]
	fn test_parse_later_duplicate_wins() {
		let parsed = parse_label_pairs("a=1,a=2");
		assert_eq!(parsed.labels, map(&[("a", "2")]));
	}

	#[test]
	fn test_selector_is_sorted_and_comma_joined() {
		let labels = OwnershipLabels::from_labels(map(&[("z", "1"), ("a", "2")])).unwrap();
		assert_eq!(labels.selector(), "a=2,z=1");
		assert_eq!(labels.to_string(), "a=2,z=1");
	}

	#[test]
	fn test_default_selector() {
		assert_eq!(
			OwnershipLabels::default().selector(),
			"authorino.kuadrant.io/managed-by=authorino"
		);
	}

	#[test]
	fn test_apply_overwrites_caller_value() {
		let ownership = OwnershipLabels::default();
		let mut labels = map(&[
			("team", "x"),
			("authorino.kuadrant.io/managed-by", "other"),
		]);
		ownership.apply(&mut labels);
		assert_eq!(
			labels,
			map(&[
				("authorino.kuadrant.io/managed-by", "authorino"),
				("team", "x")
			])
		);
	}

	#[test]
	fn test_is_owned_requires_every_pair() {
		let ownership = OwnershipLabels::from_labels(map(&[("a", "1"), ("b", "2")])).unwrap();
		assert!(ownership.is_owned(&map(&[("a", "1"), ("b", "2"), ("c", "3")])));
		assert!(!ownership.is_owned(&map(&[("a", "1")])));
		assert!(!ownership.is_owned(&map(&[("a", "1"), ("b", "3")])));
	}

	#[test]
	fn test_from_labels_rejects_empty() {
		assert!(OwnershipLabels::from_labels(BTreeMap::new()).is_none());
	}

	mod proptests {
		use super::*;
		use proptest::prelude::*;

		fn label_key() -> impl Strategy<Value = String> {
			"[a-z][a-z0-9./-]{0,20}"
		}

		fn label_value() -> impl Strategy<Value = String> {
			"[a-zA-Z0-9._-]{0,20}"
		}

		proptest! {
			#[test]
			fn resolve_is_never_empty(raw in ".*") {
				let labels = OwnershipLabels::resolve(Some(&raw));
				prop_assert!(!labels.is_empty());
			}

			#[test]
			fn parse_keeps_exactly_the_well_formed_pairs(
				pairs in prop::collection::btree_map(label_key(), label_value(), 1..6),
				junk in prop::collection::vec("[a-z]{1,8}", 0..4)
			) {
				let mut entries: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
				entries.extend(junk.iter().cloned());
				let parsed = parse_label_pairs(&entries.join(","));
				prop_assert_eq!(parsed.labels, pairs);
				prop_assert_eq!(parsed.skipped, junk.len());
			}

			#[test]
			fn apply_yields_superset_with_ownership_winning(
				owned in prop::collection::btree_map(label_key(), label_value(), 1..4),
				caller in prop::collection::btree_map(label_key(), label_value(), 0..6)
			) {
				let ownership = OwnershipLabels::from_labels(owned.clone()).unwrap();
				let mut labels = caller.clone();
				ownership.apply(&mut labels);

				prop_assert!(ownership.is_owned(&labels));
				for (k, v) in &caller {
					if !owned.contains_key(k) {
						prop_assert_eq!(labels.get(k), Some(v));
					}
				}
			}
		}
	}
}
