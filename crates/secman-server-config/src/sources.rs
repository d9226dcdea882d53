// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{HttpConfigLayer, LoggingConfigLayer, OwnershipConfigLayer, WebConfigLayer};

/// Environment variable carrying the raw ownership label override.
pub const MANAGED_BY_LABEL_ENV: &str = "MANAGED_BY_LABEL";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
	required: bool,
}

impl TomlSource {
	/// A file that must exist; a missing file is a `ConfigError::FileRead`.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}

	/// A file that is skipped when absent.
	pub fn optional(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	pub fn system() -> Self {
		Self::optional("/etc/secman/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.required && !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: SECMAN_SERVER_<SECTION>_<FIELD>, plus `MANAGED_BY_LABEL` for
/// the ownership label override.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_lookup(|name| std::env::var(name).ok())
	}
}

/// Build a layer from an arbitrary variable lookup. Empty values count as unset.
pub(crate) fn load_from_lookup<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

	Ok(ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: var("SECMAN_SERVER_HOST"),
			port: parse_u16("SECMAN_SERVER_PORT", var("SECMAN_SERVER_PORT"))?,
		}),
		ownership: Some(OwnershipConfigLayer {
			labels: var(MANAGED_BY_LABEL_ENV),
			strict: parse_bool(
				"SECMAN_SERVER_OWNERSHIP_STRICT",
				var("SECMAN_SERVER_OWNERSHIP_STRICT"),
			)?,
		}),
		web: Some(WebConfigLayer {
			dir: var("SECMAN_SERVER_WEB_DIR").map(PathBuf::from),
		}),
		logging: Some(LoggingConfigLayer {
			level: var("SECMAN_SERVER_LOG_LEVEL"),
			format: var("SECMAN_SERVER_LOG_FORMAT"),
		}),
	})
}

fn parse_bool(name: &str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
	match value {
		Some(v) => match v.trim().to_ascii_lowercase().as_str() {
			"true" | "1" | "yes" => Ok(Some(true)),
			"false" | "0" | "no" => Ok(Some(false)),
			_ => Err(ConfigError::invalid(name, format!("invalid boolean value '{v}'"))),
		},
		None => Ok(None),
	}
}

fn parse_u16(name: &str, value: Option<String>) -> Result<Option<u16>, ConfigError> {
	match value {
		Some(v) => v
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::invalid(name, format!("invalid u16 value '{v}'"))),
		None => Ok(None),
	}
}
