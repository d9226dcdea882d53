// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use kube::{
	api::{Api, DeleteParams, ListParams, PostParams},
	Client,
};
use tracing::{debug, instrument};

use crate::client::SecretsClient;
use crate::error::K8sError;
use crate::types::Secret;

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default().await?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	fn secrets(&self, namespace: &str) -> Api<Secret> {
		Api::namespaced(self.client.clone(), namespace)
	}
}

#[async_trait]
impl SecretsClient for KubeClient {
	#[instrument(skip(self, secret), fields(name = ?secret.metadata.name))]
	async fn create_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError> {
		let name = secret.metadata.name.clone().unwrap_or_default();
		self
			.secrets(namespace)
			.create(&PostParams::default(), &secret)
			.await
			.map_err(|e| K8sError::from_kube(&name, e))
	}

	#[instrument(skip(self))]
	async fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret, K8sError> {
		self
			.secrets(namespace)
			.get(name)
			.await
			.map_err(|e| K8sError::from_kube(name, e))
	}

	#[instrument(skip(self, secret), fields(name = ?secret.metadata.name))]
	async fn replace_secret(&self, namespace: &str, secret: Secret) -> Result<Secret, K8sError> {
		let name = secret.metadata.name.clone().unwrap_or_default();
		self
			.secrets(namespace)
			.replace(&name, &PostParams::default(), &secret)
			.await
			.map_err(|e| K8sError::from_kube(&name, e))
	}

	#[instrument(skip(self))]
	async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), K8sError> {
		match self
			.secrets(namespace)
			.delete(name, &DeleteParams::default())
			.await
		{
			Ok(_) => Ok(()),
			Err(e) => Err(K8sError::from_kube(name, e)),
		}
	}

	#[instrument(skip(self))]
	async fn list_secrets(
		&self,
		namespace: &str,
		label_selector: &str,
	) -> Result<Vec<Secret>, K8sError> {
		let lp = ListParams::default().labels(label_selector);
		let list = self.secrets(namespace).list(&lp).await?;
		debug!(count = list.items.len(), "listed secrets");
		Ok(list.items)
	}

	async fn server_version(&self) -> Result<String, K8sError> {
		let info = self.client.apiserver_version().await?;
		Ok(info.git_version)
	}
}
