// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Equality-based label selectors.

use std::collections::BTreeMap;

use crate::error::K8sError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
	Equals { key: String, value: String },
	NotEquals { key: String, value: String },
}

impl Requirement {
	fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
		match self {
			Requirement::Equals { key, value } => labels.get(key) == Some(value),
			Requirement::NotEquals { key, value } => labels.get(key) != Some(value),
		}
	}
}

/// A parsed equality-based label selector (`k=v`, `k==v`, `k!=v`, comma separated).
///
/// All requirements must hold for a match. An empty selector matches everything.
/// Set-based syntax (`in`, `notin`, bare existence checks) is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LabelSelector {
	requirements: Vec<Requirement>,
}

impl LabelSelector {
	pub(crate) fn parse(selector: &str) -> Result<Self, K8sError> {
		let mut requirements = Vec::new();
		for term in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
			requirements.push(parse_term(selector, term)?);
		}
		Ok(Self { requirements })
	}

	pub(crate) fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
		self.requirements.iter().all(|r| r.matches(labels))
	}
}

fn parse_term(selector: &str, term: &str) -> Result<Requirement, K8sError> {
	let invalid = |message: &str| K8sError::InvalidSelector {
		selector: selector.to_string(),
		message: message.to_string(),
	};

	let (key, value, negate) = if let Some((k, v)) = term.split_once("!=") {
		(k, v, true)
	} else if let Some((k, v)) = term.split_once("==") {
		(k, v, false)
	} else if let Some((k, v)) = term.split_once('=') {
		(k, v, false)
	} else {
		return Err(invalid(&format!("unsupported requirement '{term}'")));
	};

	let key = key.trim();
	let value = value.trim();
	if key.is_empty() {
		return Err(invalid("empty label key"));
	}
	if value.contains('=') || value.contains(' ') {
		return Err(invalid(&format!("invalid value in '{term}'")));
	}

	let (key, value) = (key.to_string(), value.to_string());
	Ok(if negate {
		Requirement::NotEquals { key, value }
	} else {
		Requirement::Equals { key, value }
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_empty_selector_matches_everything() {
		let selector = LabelSelector::parse("").unwrap();
		assert!(selector.requirements.is_empty());
		assert!(selector.matches(&labels(&[])));
		assert!(selector.matches(&labels(&[("a", "b")])));
	}

	#[test]
	fn test_equality_requires_all_terms() {
		let selector = LabelSelector::parse("app=web,tier=frontend").unwrap();
		assert!(selector.matches(&labels(&[("app", "web"), ("tier", "frontend"), ("x", "y")])));
		assert!(!selector.matches(&labels(&[("app", "web")])));
		assert!(!selector.matches(&labels(&[("app", "web"), ("tier", "backend")])));
	}

	#[test]
	fn test_double_equals_and_not_equals() {
		let selector = LabelSelector::parse("app==web, env!=prod").unwrap();
		assert!(selector.matches(&labels(&[("app", "web")])));
		assert!(selector.matches(&labels(&[("app", "web"), ("env", "dev")])));
		assert!(!selector.matches(&labels(&[("app", "web"), ("env", "prod")])));
	}

	#[test]
	fn test_keys_with_prefix_and_slash() {
		let selector = LabelSelector::parse("authorino.kuadrant.io/managed-by=authorino").unwrap();
		assert!(selector.matches(&labels(&[(
			"authorino.kuadrant.io/managed-by",
			"authorino"
		)])));
		assert!(!selector.matches(&labels(&[(
			"authorino.kuadrant.io/managed-by",
			"other"
		)])));
	}

	#[test]
	fn test_rejects_set_based_syntax() {
		assert!(matches!(
			LabelSelector::parse("env in (prod,dev)"),
			Err(K8sError::InvalidSelector { .. })
		));
		assert!(LabelSelector::parse("app").is_err());
		assert!(LabelSelector::parse("=web").is_err());
	}
}
