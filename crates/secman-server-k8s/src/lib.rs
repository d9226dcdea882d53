// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s Secret client abstraction for secman.
//!
//! This crate provides:
//! - A trait-based client over namespaced `Secret` objects for testability
//! - Production implementation using the kube crate
//! - An in-memory implementation with equality label-selector semantics

mod client;
mod error;
mod kube_client;
mod memory_client;
mod selector;
mod types;

pub use client::SecretsClient;
pub use error::K8sError;
pub use kube_client::KubeClient;
pub use memory_client::MemorySecretsClient;
pub use types::{ByteString, ObjectMeta, Secret, OPAQUE_SECRET_TYPE};
