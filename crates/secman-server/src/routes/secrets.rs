// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP handlers for `/secrets`.
//!
//! One resource, dispatched on method. Request bodies are decoded from raw
//! bytes so that every malformed body, whatever its content type, is a 400.

use axum::{
	body::Bytes,
	extract::{Query, State},
	http::{Method, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use secman_server_secrets::SecretRecord;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{api::AppState, error::ServerError};

/// Query parameters accepted by `/secrets`. Empty values count as missing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SecretsQuery {
	/// Target namespace.
	#[serde(default)]
	pub namespace: Option<String>,
	/// Secret name (DELETE only).
	#[serde(default)]
	pub name: Option<String>,
}

impl SecretsQuery {
	fn namespace(&self) -> Option<&str> {
		non_empty(self.namespace.as_deref())
	}

	fn name(&self) -> Option<&str> {
		non_empty(self.name.as_deref())
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

/// Decode a secret record, rejecting blank identity fields.
fn decode_record(body: &[u8]) -> Result<SecretRecord, ServerError> {
	let record: SecretRecord = serde_json::from_slice(body).map_err(|e| {
		tracing::debug!(error = %e, "undecodable secret payload");
		ServerError::invalid_payload()
	})?;
	if record.validate().is_err() {
		return Err(ServerError::invalid_payload());
	}
	Ok(record)
}

#[utoipa::path(
    get,
    path = "/secrets",
    params(SecretsQuery),
    responses(
        (status = 200, description = "Managed secrets in the namespace", body = [SecretRecord]),
        (status = 400, description = "Namespace is required", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    ),
    tag = "secrets"
)]
/// GET /secrets?namespace=... - List managed secrets.
pub async fn list_secrets(
	method: Method,
	State(state): State<AppState>,
	Query(query): Query<SecretsQuery>,
) -> Result<Response, ServerError> {
	// axum routes HEAD to the GET handler.
	if method == Method::HEAD {
		return Ok(method_not_allowed().await.into_response());
	}

	let namespace = query
		.namespace()
		.ok_or_else(|| ServerError::BadRequest("Namespace is required".to_string()))?;

	let records = state
		.store
		.list(namespace)
		.await
		.map_err(ServerError::List)?;

	tracing::info!(%namespace, count = records.len(), "list_secrets: ok");
	Ok(Json(records).into_response())
}

#[utoipa::path(
    post,
    path = "/secrets",
    request_body = SecretRecord,
    responses(
        (status = 201, description = "Secret created", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request payload", body = String, content_type = "text/plain"),
        (status = 500, description = "Name taken or store failure", body = String, content_type = "text/plain")
    ),
    tag = "secrets"
)]
/// POST /secrets - Create a managed secret.
pub async fn create_secret(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
	let record = decode_record(&body)?;
	let (name, namespace) = (record.name.clone(), record.namespace.clone());

	state
		.store
		.create(record)
		.await
		.map_err(ServerError::Create)?;

	tracing::info!(%namespace, %name, "create_secret: ok");
	Ok((
		StatusCode::CREATED,
		format!("Secret {name} created successfully in namespace {namespace}\n"),
	))
}

#[utoipa::path(
    put,
    path = "/secrets",
    request_body = SecretRecord,
    responses(
        (status = 200, description = "Secret updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid request payload", body = String, content_type = "text/plain"),
        (status = 500, description = "Secret missing or store failure", body = String, content_type = "text/plain")
    ),
    tag = "secrets"
)]
/// PUT /secrets - Replace the labels and data of an existing secret.
pub async fn update_secret(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<impl IntoResponse, ServerError> {
	let record = decode_record(&body)?;
	let (name, namespace) = (record.name.clone(), record.namespace.clone());

	state
		.store
		.update(record)
		.await
		.map_err(ServerError::Update)?;

	tracing::info!(%namespace, %name, "update_secret: ok");
	Ok((
		StatusCode::OK,
		format!("Secret {name} updated successfully in namespace {namespace}\n"),
	))
}

#[utoipa::path(
    delete,
    path = "/secrets",
    params(SecretsQuery),
    responses(
        (status = 200, description = "Secret deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Namespace and secret name are required", body = String, content_type = "text/plain"),
        (status = 500, description = "Secret missing or store failure", body = String, content_type = "text/plain")
    ),
    tag = "secrets"
)]
/// DELETE /secrets?namespace=...&name=... - Delete a secret.
pub async fn delete_secret(
	State(state): State<AppState>,
	Query(query): Query<SecretsQuery>,
) -> Result<impl IntoResponse, ServerError> {
	let (Some(namespace), Some(name)) = (query.namespace(), query.name()) else {
		return Err(ServerError::BadRequest(
			"Namespace and secret name are required".to_string(),
		));
	};

	state
		.store
		.delete(namespace, name)
		.await
		.map_err(ServerError::Delete)?;

	tracing::info!(%namespace, %name, "delete_secret: ok");
	Ok((
		StatusCode::OK,
		format!("Secret {name} deleted successfully from namespace {namespace}\n"),
	))
}

/// Any other method on `/secrets`.
pub async fn method_not_allowed() -> impl IntoResponse {
	(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_record_accepts_missing_labels() {
		let record = decode_record(br#"{"name":"s1","namespace":"ns","data":{"k":"v"}}"#).unwrap();
		assert_eq!(record.name, "s1");
		assert!(record.labels.is_empty());
	}

	#[test]
	fn test_decode_record_rejects_bad_payloads() {
		for body in [
			&b"not json"[..],
			br#"{"name":"s1","namespace":"ns"}"#,
			br#"{"name":"","namespace":"ns","data":{}}"#,
			br#"{"name":"s1","namespace":"","data":{}}"#,
			br#"{"name":"s1","namespace":"ns","data":{"k":1}}"#,
		] {
			let err = decode_record(body).unwrap_err();
			assert_eq!(err.to_string(), "Invalid request payload");
		}
	}

	#[test]
	fn test_query_treats_empty_as_missing() {
		let query = SecretsQuery {
			namespace: Some(String::new()),
			name: Some("s1".to_string()),
		};
		assert_eq!(query.namespace(), None);
		assert_eq!(query.name(), Some("s1"));
	}
}
