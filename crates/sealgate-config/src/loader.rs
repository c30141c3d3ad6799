// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sealgate.toml` > `~/.config/sealgate/sealgate.toml`
//! > `/etc/sealgate/sealgate.toml` with environment variable overrides via the
//! `SEALGATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SealgateConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sealgate/sealgate.toml` (system-wide)
/// 3. `~/.config/sealgate/sealgate.toml` (user XDG config)
/// 4. `./sealgate.toml` (local directory)
/// 5. `SEALGATE_*` environment variables
pub fn load_config() -> Result<SealgateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used by tests and callers that carry their own TOML.
pub fn load_config_from_str(toml_content: &str) -> Result<SealgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SealgateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SealgateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SealgateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for XDG config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SealgateConfig::default()))
        .merge(Toml::file("/etc/sealgate/sealgate.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sealgate/sealgate.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sealgate.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SEALGATE_GATEWAY_TIMEOUT_AS_FAILURE` must
/// map to `gateway.timeout_as_failure`, not `gateway.timeout.as.failure`.
///
/// `SEALGATE_PASSWORD` is the out-of-band credential channel for the CLI, not
/// a config key, so it is excluded from the provider.
fn env_provider() -> Env {
    Env::prefixed("SEALGATE_").ignore(&["password"]).map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SEALGATE_GATEWAY_SECRET -> "gateway_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("gateway_", "gateway.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
