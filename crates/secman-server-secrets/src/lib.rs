// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Managed secret store for secman.
//!
//! This crate holds the rules that keep secman from touching secrets it does
//! not own:
//!
//! - Every secret written through the store carries the ownership labels,
//!   with ownership values winning over caller-supplied ones.
//! - Every listing is scoped by an equality selector built from the
//!   ownership labels.
//!
//! # Architecture
//!
//! The store sits between the HTTP API (secman-server) and the Kubernetes
//! client (secman-server-k8s). The ownership label set is resolved once at
//! startup and injected into [`ManagedSecretStore::new`].

pub mod error;
pub mod labels;
pub mod store;
pub mod types;

pub use error::SecretsError;
pub use labels::{
	parse_label_pairs, OwnershipLabels, ParsedLabels, DEFAULT_OWNERSHIP_LABEL_KEY,
	DEFAULT_OWNERSHIP_LABEL_VALUE,
};
pub use secman_server_k8s::{K8sError, SecretsClient};
pub use store::{ManagedSecretStore, OwnershipPolicy};
pub use types::SecretRecord;
