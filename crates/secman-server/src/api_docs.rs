// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI documentation for secman-server, served at `/api/openapi.json`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "secman API",
        description = "Create, list, update and delete Kubernetes secrets that carry the secman ownership labels.",
        license(name = "Proprietary"),
        contact(
            name = "Geoffrey Huntley",
            email = "ghuntley@ghuntley.com",
            url = "https://ghuntley.com"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "secrets", description = "Ownership-labelled secret management"),
        (name = "health", description = "Health checks")
    ),
    paths(
        crate::routes::secrets::list_secrets,
        crate::routes::secrets::create_secret,
        crate::routes::secrets::update_secret,
        crate::routes::secrets::delete_secret,
        crate::routes::health::health_check,
    ),
    components(schemas(
        secman_server_secrets::SecretRecord,
        crate::health::HealthResponse,
        crate::health::HealthStatus,
        crate::health::KubernetesHealth,
    ))
)]
pub struct ApiDoc;
