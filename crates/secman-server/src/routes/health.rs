// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
	api::AppState,
	health::{self, HealthResponse, HealthStatus},
};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Kubernetes API reachable", body = HealthResponse),
        (status = 503, description = "Kubernetes API unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Report reachability of the Kubernetes API.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let kubernetes = health::check_kubernetes(&state.store).await;
	let status = kubernetes.status;

	let response = HealthResponse {
		status,
		version: env!("CARGO_PKG_VERSION").to_string(),
		ownership_labels: state.store.ownership().as_map().clone(),
		kubernetes,
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => {
			tracing::warn!(error = ?response.kubernetes.error, "health_check: kubernetes unreachable");
			StatusCode::SERVICE_UNAVAILABLE
		}
	};

	(http_status, Json(response))
}
