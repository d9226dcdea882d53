// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.
//!
//! Error bodies are plain text terminated by a newline.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use secman_server_secrets::SecretsError;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Missing query parameter or undecodable body.
	#[error("{0}")]
	BadRequest(String),

	#[error("Error fetching secrets: {0}")]
	List(#[source] SecretsError),

	#[error("Error creating secret: {0}")]
	Create(#[source] SecretsError),

	#[error("Error updating secret: {0}")]
	Update(#[source] SecretsError),

	#[error("Error deleting secret: {0}")]
	Delete(#[source] SecretsError),
}

impl ServerError {
	pub fn invalid_payload() -> Self {
		ServerError::BadRequest("Invalid request payload".to_string())
	}

	pub fn status(&self) -> StatusCode {
		match self {
			ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ServerError::List(e)
			| ServerError::Create(e)
			| ServerError::Update(e)
			| ServerError::Delete(e) => match e {
				SecretsError::Validation(_) => StatusCode::BAD_REQUEST,
				_ => StatusCode::INTERNAL_SERVER_ERROR,
			},
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::warn!(error = %self, "rejected request");
		}
		(status, format!("{self}\n")).into_response()
	}
}
