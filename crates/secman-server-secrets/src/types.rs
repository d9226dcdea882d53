// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Canonical secret record and its translation to and from K8s `Secret`.

use std::collections::BTreeMap;
use std::fmt;

use secman_server_k8s::{ByteString, ObjectMeta, Secret, OPAQUE_SECRET_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::SecretsError;

const REDACTED: &str = "[REDACTED]";

/// A namespaced opaque secret as exposed by the API.
///
/// Identified by `(namespace, name)`. `data` values are plain text here and
/// raw bytes in the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SecretRecord {
	pub name: String,
	pub namespace: String,
	#[serde(default)]
	pub labels: BTreeMap<String, String>,
	pub data: BTreeMap<String, String>,
}

impl fmt::Debug for SecretRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let data: BTreeMap<&str, &str> = self
			.data
			.keys()
			.map(|k| (k.as_str(), REDACTED))
			.collect();
		f.debug_struct("SecretRecord")
			.field("name", &self.name)
			.field("namespace", &self.namespace)
			.field("labels", &self.labels)
			.field("data", &data)
			.finish()
	}
}

impl SecretRecord {
	pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			namespace: namespace.into(),
			labels: BTreeMap::new(),
			data: BTreeMap::new(),
		}
	}

	pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.labels.insert(key.into(), value.into());
		self
	}

	pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}

	/// Reject records the store could never accept.
	pub fn validate(&self) -> Result<(), SecretsError> {
		if self.name.trim().is_empty() {
			return Err(SecretsError::Validation("secret name is required".to_string()));
		}
		if self.namespace.trim().is_empty() {
			return Err(SecretsError::Validation("namespace is required".to_string()));
		}
		Ok(())
	}

	/// Build an `Opaque` K8s secret carrying this record's labels and data.
	pub fn to_k8s(&self) -> Secret {
		Secret {
			metadata: ObjectMeta {
				name: Some(self.name.clone()),
				namespace: Some(self.namespace.clone()),
				labels: Some(self.labels.clone()),
				..Default::default()
			},
			data: Some(encode_data(&self.data)),
			type_: Some(OPAQUE_SECRET_TYPE.to_string()),
			..Default::default()
		}
	}

	/// Read a record back from a K8s secret.
	///
	/// Byte values are decoded as UTF-8, replacing invalid sequences. Any
	/// `stringData` still present on the object wins over `data`.
	pub fn from_k8s(secret: &Secret) -> Self {
		let mut data: BTreeMap<String, String> = secret
			.data
			.as_ref()
			.map(|d| {
				d.iter()
					.map(|(k, v)| (k.clone(), String::from_utf8_lossy(&v.0).into_owned()))
					.collect()
			})
			.unwrap_or_default();

		if let Some(ref string_data) = secret.string_data {
			data.extend(string_data.iter().map(|(k, v)| (k.clone(), v.clone())));
		}

		Self {
			name: secret.metadata.name.clone().unwrap_or_default(),
			namespace: secret.metadata.namespace.clone().unwrap_or_default(),
			labels: secret.metadata.labels.clone().unwrap_or_default(),
			data,
		}
	}
}

pub(crate) fn encode_data(data: &BTreeMap<String, String>) -> BTreeMap<String, ByteString> {
	data
		.iter()
		.map(|(k, v)| (k.clone(), ByteString(v.as_bytes().to_vec())))
		.collect()
}
