// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! secman HTTP server library.
//!
//! Exposes `/secrets` for CRUD over ownership-labelled K8s secrets, a
//! `/health` probe, the OpenAPI document and a static web UI.

pub mod api;
pub mod api_docs;
pub mod error;
pub mod health;
pub mod routes;

pub use api::{create_app_state, create_router, AppState};
pub use error::ServerError;
pub use secman_server_config::ServerConfig;
