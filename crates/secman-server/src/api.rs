// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use secman_server_config::ServerConfig;
use secman_server_k8s::SecretsClient;
use secman_server_secrets::{ManagedSecretStore, OwnershipLabels, OwnershipPolicy};
use tower_http::services::ServeDir;

use crate::routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<ManagedSecretStore>,
	pub web_dir: PathBuf,
}

/// Build the application state from the resolved configuration.
///
/// The ownership label set is resolved here, once, and handed to the store.
pub fn create_app_state(client: Arc<dyn SecretsClient>, config: &ServerConfig) -> AppState {
	let ownership = OwnershipLabels::resolve(config.ownership.labels.as_deref());
	let policy = OwnershipPolicy::from_strict(config.ownership.strict);

	tracing::info!(
		ownership_labels = %ownership,
		policy = ?policy,
		"Resolved ownership labels"
	);

	AppState {
		store: Arc::new(ManagedSecretStore::new(client, ownership, policy)),
		web_dir: config.web.dir.clone(),
	}
}

/// Build the HTTP router.
///
/// Paths not matched by an API route are served from the web directory.
pub fn create_router(state: AppState) -> Router {
	let web_dir = state.web_dir.clone();

	Router::new()
		.route(
			"/secrets",
			get(routes::secrets::list_secrets)
				.post(routes::secrets::create_secret)
				.put(routes::secrets::update_secret)
				.delete(routes::secrets::delete_secret)
				.fallback(routes::secrets::method_not_allowed),
		)
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(routes::docs::openapi_json))
		.fallback_service(ServeDir::new(web_dir))
		.with_state(state)
}
