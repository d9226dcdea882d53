// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static web UI configuration.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_WEB_DIR: &str = "./static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
	/// Directory served for every path not matched by an API route.
	pub dir: PathBuf,
}

impl Default for WebConfig {
	fn default() -> Self {
		Self {
			dir: PathBuf::from(DEFAULT_WEB_DIR),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfigLayer {
	#[serde(default)]
	pub dir: Option<PathBuf>,
}

impl WebConfigLayer {
	pub fn merge(&mut self, other: WebConfigLayer) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
	}

	pub fn finalize(self) -> WebConfig {
		WebConfig {
			dir: self.dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WEB_DIR)),
		}
	}
}
