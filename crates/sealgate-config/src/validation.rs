// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: the gateway endpoint and secret must be set, key lists must be
//! usable, and enumerated values must parse.

use sealgate_core::types::IdentityField;

use crate::diagnostic::ConfigError;
use crate::model::SealgateConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast). Note the compiled
/// defaults alone do not pass: `gateway.host` and `gateway.secret` have to
/// come from a config file or the environment.
pub fn validate_config(config: &SealgateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must be set to the SSO gateway hostname".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    match config.gateway.secret.as_deref() {
        Some(secret) if !secret.trim().is_empty() => {}
        _ => errors.push(ConfigError::Validation {
            message: "gateway.secret must be set to the shared secret".to_string(),
        }),
    }

    if config.gateway.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.auth.authentication_keys.is_empty() {
        errors.push(ConfigError::Validation {
            message: "auth.authentication_keys must list at least one attempt key".to_string(),
        });
    }
    for (i, key) in config.auth.authentication_keys.iter().enumerate() {
        if key.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("auth.authentication_keys[{i}] must not be empty"),
            });
        }
    }

    if config.auth.uid_field.parse::<IdentityField>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.uid_field `{}` is not an identity field (expected `uid` or `username`)",
                config.auth.uid_field
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of trace, debug, info, warn, error",
                config.log.level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
