// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::Secret;

/// Trait for K8s Secret operations.
///
/// This abstraction allows for easy mocking in tests while providing
/// a clean interface for the Secret operations needed by the managed
/// secret store. Every method maps to exactly one API call; there are no
/// implicit retries.
#[async_trait]
pub trait SecretsClient: Send + Sync {
	/// Create a new secret in the specified namespace.
	///
	/// Fails with `K8sError::AlreadyExists` when the name is taken.
	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError>;

	/// Get a specific secret by name from the specified namespace.
	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError>;

	/// Replace an existing secret. The object's metadata carries the name.
	async fn replace_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError>;

	/// Delete a secret by name from the specified namespace.
	async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), K8sError>;

	/// List secrets in a namespace matching the given label selector.
	async fn list_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> Result<Vec<Secret>, K8sError>;

	/// Report the API server version. Used for health checks.
	async fn server_version(&self) -> Result<String, K8sError>;
}
