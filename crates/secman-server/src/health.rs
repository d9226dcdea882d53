// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check types and component checking logic.

use std::collections::BTreeMap;
use std::time::Duration;

use secman_server_secrets::ManagedSecretStore;
use serde::Serialize;
use tokio::time::{timeout, Instant};
use utoipa::ToSchema;

/// Health status for components and overall system.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

/// Kubernetes API reachability.
#[derive(Debug, Serialize, ToSchema)]
pub struct KubernetesHealth {
	pub status: HealthStatus,
	pub latency_ms: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// Response body of `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
	pub status: HealthStatus,
	/// Server package version.
	pub version: String,
	/// Labels every managed secret carries.
	pub ownership_labels: BTreeMap<String, String>,
	pub kubernetes: KubernetesHealth,
}

pub const K8S_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe the backing store by asking for its version.
pub async fn check_kubernetes(store: &ManagedSecretStore) -> KubernetesHealth {
	check_kubernetes_with_timeout(store, K8S_CHECK_TIMEOUT).await
}

pub async fn check_kubernetes_with_timeout(
	store: &ManagedSecretStore,
	limit: Duration,
) -> KubernetesHealth {
	let start = Instant::now();
	let result = timeout(limit, store.server_version()).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	match result {
		Ok(Ok(version)) => KubernetesHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			version: Some(version),
			error: None,
		},
		Ok(Err(e)) => KubernetesHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			version: None,
			error: Some(e.to_string()),
		},
		Err(_) => KubernetesHealth {
			status: HealthStatus::Unhealthy,
			latency_ms,
			version: None,
			error: Some("Kubernetes health check timed out".to_string()),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use async_trait::async_trait;
	use secman_server_k8s::{K8sError, MemorySecretsClient, Secret, SecretsClient};
	use secman_server_secrets::{OwnershipLabels, OwnershipPolicy};

	/// API server that accepts connections but never answers.
	struct StalledClient;

	#[async_trait]
	impl SecretsClient for StalledClient {
		async fn create_secret(&self, _: &str, _: Secret) -> Result<Secret, K8sError> {
			std::future::pending().await
		}

		async fn get_secret(&self, _: &str, _: &str) -> Result<Secret, K8sError> {
			std::future::pending().await
		}

		async fn replace_secret(&self, _: &str, _: Secret) -> Result<Secret, K8sError> {
			std::future::pending().await
		}

		async fn delete_secret(&self, _: &str, _: &str) -> Result<(), K8sError> {
			std::future::pending().await
		}

		async fn list_secrets(&self, _: &str, _: &str) -> Result<Vec<Secret>, K8sError> {
			std::future::pending().await
		}

		async fn server_version(&self) -> Result<String, K8sError> {
			std::future::pending().await
		}
	}

	fn store(client: Arc<MemorySecretsClient>) -> ManagedSecretStore {
		ManagedSecretStore::new(client, OwnershipLabels::default(), OwnershipPolicy::Lenient)
	}

	#[tokio::test]
	async fn test_reachable_store_is_healthy() {
		let health = check_kubernetes(&store(Arc::new(MemorySecretsClient::new()))).await;
		assert_eq!(health.status, HealthStatus::Healthy);
		assert_eq!(health.version.as_deref(), Some("in-memory"));
		assert!(health.error.is_none());
	}

	#[tokio::test]
	async fn test_unreachable_store_is_unhealthy() {
		let client = Arc::new(MemorySecretsClient::new());
		client.set_unavailable(true);
		let health = check_kubernetes(&store(client)).await;
		assert_eq!(health.status, HealthStatus::Unhealthy);
		assert!(health.version.is_none());
		assert!(health.error.unwrap().contains("connection refused"));
	}

	#[tokio::test]
	async fn test_stalled_store_times_out_unhealthy() {
		let store = ManagedSecretStore::new(
			Arc::new(StalledClient),
			OwnershipLabels::default(),
			OwnershipPolicy::Lenient,
		);
		let health = check_kubernetes_with_timeout(&store, Duration::from_millis(10)).await;
		assert_eq!(health.status, HealthStatus::Unhealthy);
		assert!(health.version.is_none());
		assert!(health.error.unwrap().contains("timed out"));
	}

	#[test]
	fn test_status_serializes_lowercase() {
		assert_eq!(
			serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
			"\"unhealthy\""
		);
	}
}
