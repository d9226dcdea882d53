// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! CRUD over K8s secrets, restricted to secrets carrying the ownership labels.

use std::sync::Arc;

use secman_server_k8s::SecretsClient;
use tracing::instrument;

use crate::error::SecretsError;
use crate::labels::OwnershipLabels;
use crate::types::{encode_data, SecretRecord};

/// How update and delete treat secrets that exist but lack the ownership labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OwnershipPolicy {
	/// Update and delete act on any secret addressed by name. Only listing
	/// filters by ownership.
	#[default]
	Lenient,
	/// Update and delete refuse secrets without the ownership labels and
	/// report them as not found.
	Strict,
}

impl OwnershipPolicy {
	pub fn from_strict(strict: bool) -> Self {
		if strict {
			OwnershipPolicy::Strict
		} else {
			OwnershipPolicy::Lenient
		}
	}
}

/// The managed secret store.
pub struct ManagedSecretStore {
	client: Arc<dyn SecretsClient>,
	ownership: OwnershipLabels,
	policy: OwnershipPolicy,
}

impl ManagedSecretStore {
	/// Create a new store over the given client with the resolved ownership labels.
	pub fn new(
		client: Arc<dyn SecretsClient>,
		ownership: OwnershipLabels,
		policy: OwnershipPolicy,
	) -> Self {
		Self {
			client,
			ownership,
			policy,
		}
	}

	pub fn ownership(&self) -> &OwnershipLabels {
		&self.ownership
	}

	pub fn policy(&self) -> OwnershipPolicy {
		self.policy
	}

	/// Create a secret, asserting the ownership labels on it.
	///
	/// Fails with `SecretsError::Conflict` if `(namespace, name)` is taken.
	#[instrument(skip(self, record), fields(namespace = %record.namespace, name = %record.name))]
	pub async fn create(&self, mut record: SecretRecord) -> Result<(), SecretsError> {
		record.validate()?;
		self.ownership.apply(&mut record.labels);

		self
			.client
			.create_secret(&record.namespace, record.to_k8s())
			.await
			.map_err(|e| SecretsError::from_k8s("create", target(&record.namespace, &record.name), e))?;

		tracing::info!(namespace = %record.namespace, name = %record.name, keys = record.data.len(), "Created secret");
		Ok(())
	}

	/// Replace the labels and data of an existing secret.
	///
	/// The existing object is fetched first; a missing secret fails with
	/// `SecretsError::NotFound` and is never created. Labels and data are
	/// replaced wholesale, then the ownership labels are re-asserted.
	#[instrument(skip(self, record), fields(namespace = %record.namespace, name = %record.name))]
	pub async fn update(&self, mut record: SecretRecord) -> Result<(), SecretsError> {
		record.validate()?;
		let target = target(&record.namespace, &record.name);

		let mut existing = self
			.client
			.get_secret(&record.name, &record.namespace)
			.await
			.map_err(|e| SecretsError::from_k8s("update", target.clone(), e))?;

		if self.policy == OwnershipPolicy::Strict
			&& !self
				.ownership
				.is_owned(existing.metadata.labels.as_ref().unwrap_or(&Default::default()))
		{
			tracing::warn!(namespace = %record.namespace, name = %record.name, "Refusing to update unmanaged secret");
			return Err(SecretsError::NotFound {
				operation: "update",
				target,
			});
		}

		self.ownership.apply(&mut record.labels);
		existing.metadata.labels = Some(record.labels);
		existing.data = Some(encode_data(&record.data));
		existing.string_data = None;

		self
			.client
			.replace_secret(&record.namespace, existing)
			.await
			.map_err(|e| SecretsError::from_k8s("update", target, e))?;

		tracing::info!(namespace = %record.namespace, name = %record.name, keys = record.data.len(), "Updated secret");
		Ok(())
	}

	/// Delete a secret by name.
	///
	/// Under `OwnershipPolicy::Lenient` the delete is issued unconditionally.
	/// Under `OwnershipPolicy::Strict` the secret is fetched first and must
	/// carry the ownership labels.
	#[instrument(skip(self))]
	pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), SecretsError> {
		if namespace.trim().is_empty() || name.trim().is_empty() {
			return Err(SecretsError::Validation(
				"namespace and secret name are required".to_string(),
			));
		}
		let target = target(namespace, name);

		if self.policy == OwnershipPolicy::Strict {
			let existing = self
				.client
				.get_secret(name, namespace)
				.await
				.map_err(|e| SecretsError::from_k8s("delete", target.clone(), e))?;
			if !self
				.ownership
				.is_owned(existing.metadata.labels.as_ref().unwrap_or(&Default::default()))
			{
				tracing::warn!(%namespace, %name, "Refusing to delete unmanaged secret");
				return Err(SecretsError::NotFound {
					operation: "delete",
					target,
				});
			}
		}

		self
			.client
			.delete_secret(name, namespace)
			.await
			.map_err(|e| SecretsError::from_k8s("delete", target, e))?;

		tracing::info!(%namespace, %name, "Deleted secret");
		Ok(())
	}

	/// List the managed secrets in a namespace.
	///
	/// Only secrets carrying every ownership label are returned. An empty
	/// result is not an error.
	#[instrument(skip(self))]
	pub async fn list(&self, namespace: &str) -> Result<Vec<SecretRecord>, SecretsError> {
		if namespace.trim().is_empty() {
			return Err(SecretsError::Validation("namespace is required".to_string()));
		}

		let selector = self.ownership.selector();
		let secrets = self
			.client
			.list_secrets(namespace, &selector)
			.await
			.map_err(|e| {
				SecretsError::from_k8s("list", format!("secrets in namespace {namespace}"), e)
			})?;

		let records: Vec<SecretRecord> = secrets
			.iter()
			.map(SecretRecord::from_k8s)
			.filter(|record| {
				let owned = self.ownership.is_owned(&record.labels);
				if !owned {
					tracing::warn!(%namespace, name = %record.name, "Store returned secret outside the ownership selector");
				}
				owned
			})
			.collect();

		tracing::debug!(%namespace, %selector, count = records.len(), "Listed secrets");
		Ok(records)
	}

	/// Version reported by the backing store. Used as a reachability probe.
	#[instrument(skip(self))]
	pub async fn server_version(&self) -> Result<String, SecretsError> {
		self
			.client
			.server_version()
			.await
			.map_err(|e| SecretsError::from_k8s("query", "server version".to_string(), e))
	}
}

fn target(namespace: &str, name: &str) -> String {
	format!("secret {namespace}/{name}")
}
