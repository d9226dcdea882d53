// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Managed secret store error types.

use secman_server_k8s::K8sError;

/// Errors that can occur during managed secret operations.
#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
	/// Missing or malformed input
	#[error("Invalid secret: {0}")]
	Validation(String),

	/// Target secret does not exist (or is not managed by this deployment)
	#[error("failed to {operation} {target}: not found")]
	NotFound {
		operation: &'static str,
		target: String,
	},

	/// Secret with the same name already exists in the namespace
	#[error("failed to {operation} {target}: already exists")]
	Conflict {
		operation: &'static str,
		target: String,
	},

	/// Any other failure from the backing store
	#[error("failed to {operation} {target}: {source}")]
	Store {
		operation: &'static str,
		target: String,
		#[source]
		source: K8sError,
	},
}

impl SecretsError {
	/// Classify a store failure for `operation` on `target`.
	///
	/// `target` is human readable, e.g. `secret ns/name`.
	pub(crate) fn from_k8s(operation: &'static str, target: String, err: K8sError) -> Self {
		match err {
			K8sError::NotFound { .. } => SecretsError::NotFound { operation, target },
			K8sError::AlreadyExists { .. } => SecretsError::Conflict { operation, target },
			source => SecretsError::Store {
				operation,
				target,
				source,
			},
		}
	}

	pub fn is_not_found(&self) -> bool {
		matches!(self, SecretsError::NotFound { .. })
	}

	pub fn is_conflict(&self) -> bool {
		matches!(self, SecretsError::Conflict { .. })
	}
}
