// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::client::SecretsClient;
use crate::error::K8sError;
use crate::selector::LabelSelector;
use crate::types::{ByteString, Secret};

type SecretKey = (String, String);

/// In-memory Secret store with API-server-like semantics.
///
/// Names are unique per namespace, `stringData` is folded into `data` on
/// write, every write bumps the `resourceVersion`, and a replace carrying a
/// stale `resourceVersion` is rejected with `K8sError::Conflict`. Used by the
/// test suites and for running the server without a cluster.
#[derive(Default)]
pub struct MemorySecretsClient {
	secrets: Mutex<BTreeMap<SecretKey, Secret>>,
	revision: AtomicU64,
	unavailable: AtomicBool,
}

impl MemorySecretsClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Make every subsequent call fail with `K8sError::ApiError`.
	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	/// Insert an object directly, bypassing any caller-side labelling.
	pub fn insert(&self, namespace: &str, mut secret: Secret) {
		let name = secret.metadata.name.clone().unwrap_or_default();
		self.normalize(namespace, &mut secret);
		self.lock().insert((namespace.to_string(), name), secret);
	}

	/// Number of stored objects across all namespaces.
	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn lock(&self) -> MutexGuard<'_, BTreeMap<SecretKey, Secret>> {
		self.secrets.lock().unwrap_or_else(|e| e.into_inner())
	}

	fn check_available(&self) -> Result<(), K8sError> {
		if self.unavailable.load(Ordering::SeqCst) {
			return Err(K8sError::ApiError {
				message: "connection refused".to_string(),
			});
		}
		Ok(())
	}

	fn normalize(&self, namespace: &str, secret: &mut Secret) {
		secret.metadata.namespace = Some(namespace.to_string());
		let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
		secret.metadata.resource_version = Some(revision.to_string());

		if let Some(string_data) = secret.string_data.take() {
			let data = secret.data.get_or_insert_with(BTreeMap::new);
			for (k, v) in string_data {
				data.insert(k, ByteString(v.into_bytes()));
			}
		}
	}
}

#[async_trait]
impl SecretsClient for MemorySecretsClient {
	async fn create_secret(&self, namespace: &str, mut secret: Secret) -> Result<Secret, K8sError> {
		self.check_available()?;
		let name = secret.metadata.name.clone().unwrap_or_default();
		if name.is_empty() {
			return Err(K8sError::ApiError {
				message: "Secret \"\" is invalid: metadata.name: Required value".to_string(),
			});
		}

		let mut secrets = self.lock();
		let key = (namespace.to_string(), name.clone());
		if secrets.contains_key(&key) {
			return Err(K8sError::AlreadyExists { name });
		}
		self.normalize(namespace, &mut secret);
		secrets.insert(key, secret.clone());
		Ok(secret)
	}

	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError> {
		self.check_available()?;
		self
			.lock()
			.get(&(namespace.to_string(), name.to_string()))
			.cloned()
			.ok_or_else(|| K8sError::NotFound {
				name: name.to_string(),
			})
	}

	async fn replace_secret(&self, namespace: &str, mut secret: Secret) -> Result<Secret, K8sError> {
		self.check_available()?;
		let name = secret.metadata.name.clone().unwrap_or_default();
		let mut secrets = self.lock();
		let key = (namespace.to_string(), name.clone());
		let current = secrets
			.get(&key)
			.ok_or_else(|| K8sError::NotFound { name: name.clone() })?;

		if let Some(ref expected) = secret.metadata.resource_version {
			if current.metadata.resource_version.as_ref() != Some(expected) {
				return Err(K8sError::Conflict {
					name,
					message: "the object has been modified; please apply your changes to the latest version and try again".to_string(),
				});
			}
		}

		self.normalize(namespace, &mut secret);
		secrets.insert(key, secret.clone());
		Ok(secret)
	}

	async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		self.check_available()?;
		self
			.lock()
			.remove(&(namespace.to_string(), name.to_string()))
			.map(|_| ())
			.ok_or_else(|| K8sError::NotFound {
				name: name.to_string(),
			})
	}

	async fn list_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> Result<Vec<Secret>, K8sError> {
		self.check_available()?;
		let selector = LabelSelector::parse(label_selector)?;
		let empty = BTreeMap::new();
		Ok(
			self
				.lock()
				.iter()
				.filter(|((ns, _), _)| ns == namespace)
				.filter(|(_, s)| selector.matches(s.metadata.labels.as_ref().unwrap_or(&empty)))
				.map(|(_, s)| s.clone())
				.collect(),
		)
	}

	async fn server_version(&self) -> Result<String, K8sError> {
		self.check_available()?;
		Ok("in-memory".to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ObjectMeta;
	use tokio_test::block_on;

	fn secret(name: &str, labels: &[(&str, &str)]) -> Secret {
		Secret {
			metadata: ObjectMeta {
				name: Some(name.to_string()),
				labels: Some(
					labels
						.iter()
						.map(|(k, v)| (k.to_string(), v.to_string()))
						.collect(),
				),
				..Default::default()
			},
			..Default::default()
		}
	}

	#[test]
	fn test_create_rejects_duplicate_name_in_namespace() {
		let client = MemorySecretsClient::new();
		block_on(client.create_secret("ns", secret("a", &[]))).unwrap();
		let err = block_on(client.create_secret("ns", secret("a", &[]))).unwrap_err();
		assert!(matches!(err, K8sError::AlreadyExists { ref name } if name == "a"));

		// Same name in another namespace is fine.
		block_on(client.create_secret("other", secret("a", &[]))).unwrap();
		assert_eq!(client.len(), 2);
	}

	#[test]
	fn test_string_data_folded_into_data() {
		let client = MemorySecretsClient::new();
		let mut s = secret("a", &[]);
		s.string_data = Some(BTreeMap::from([("k".to_string(), "v".to_string())]));
		block_on(client.create_secret("ns", s)).unwrap();

		let stored = block_on(client.get_secret("a", "ns")).unwrap();
		assert!(stored.string_data.is_none());
		assert_eq!(
			stored.data.unwrap().get("k"),
			Some(&ByteString(b"v".to_vec()))
		);
	}

	#[test]
	fn test_list_filters_by_namespace_and_selector() {
		let client = MemorySecretsClient::new();
		block_on(client.create_secret("ns", secret("owned", &[("m", "x")]))).unwrap();
		block_on(client.create_secret("ns", secret("foreign", &[("m", "y")]))).unwrap();
		block_on(client.create_secret("elsewhere", secret("owned", &[("m", "x")]))).unwrap();

		let listed = block_on(client.list_secrets("ns", "m=x")).unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].metadata.name.as_deref(), Some("owned"));
		assert_eq!(listed[0].metadata.namespace.as_deref(), Some("ns"));
	}

	#[test]
	fn test_replace_with_stale_resource_version_conflicts() {
		let client = MemorySecretsClient::new();
		let created = block_on(client.create_secret("ns", secret("a", &[]))).unwrap();
		block_on(client.replace_secret("ns", created.clone())).unwrap();

		let err = block_on(client.replace_secret("ns", created)).unwrap_err();
		assert!(matches!(err, K8sError::Conflict { .. }));
	}

	#[test]
	fn test_replace_and_delete_missing() {
		let client = MemorySecretsClient::new();
		assert!(matches!(
			block_on(client.replace_secret("ns", secret("ghost", &[]))),
			Err(K8sError::NotFound { .. })
		));
		assert!(matches!(
			block_on(client.delete_secret("ghost", "ns")),
			Err(K8sError::NotFound { .. })
		));
	}

	#[test]
	fn test_unavailable_fails_every_call() {
		let client = MemorySecretsClient::new();
		client.set_unavailable(true);
		assert!(matches!(
			block_on(client.list_secrets("ns", "")),
			Err(K8sError::ApiError { .. })
		));
		assert!(block_on(client.server_version()).is_err());

		client.set_unavailable(false);
		assert_eq!(block_on(client.server_version()).unwrap(), "in-memory");
	}
}
