// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors that can occur during K8s operations.
#[derive(Error, Debug)]
pub enum K8sError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("secrets \"{name}\" not found")]
	NotFound { name: String },

	#[error("secrets \"{name}\" already exists")]
	AlreadyExists { name: String },

	#[error("Operation on secrets \"{name}\" conflicted: {message}")]
	Conflict { name: String, message: String },

	#[error("Invalid label selector \"{selector}\": {message}")]
	InvalidSelector { selector: String, message: String },
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		K8sError::ApiError {
			message: err.to_string(),
		}
	}
}

impl K8sError {
	/// Map a kube error for the named object onto a typed variant.
	///
	/// 404 becomes `NotFound`; 409 becomes `AlreadyExists` when the API reports
	/// that reason and `Conflict` otherwise (stale resourceVersion).
	pub(crate) fn from_kube(name: &str, err: kube::Error) -> Self {
		match err {
			kube::Error::Api(ref resp) if resp.code == 404 => K8sError::NotFound { name: name.into() },
			kube::Error::Api(ref resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
				K8sError::AlreadyExists { name: name.into() }
			}
			kube::Error::Api(ref resp) if resp.code == 409 => K8sError::Conflict {
				name: name.into(),
				message: resp.message.clone(),
			},
			other => other.into(),
		}
	}
}
