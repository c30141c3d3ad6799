// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Sealgate.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sealgate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. One configuration describes one identity type: one gateway, one
/// extraction policy, one store.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SealgateConfig {
    /// SSO gateway connection settings.
    #[serde(default)]
    pub gateway: GatewaySection,

    /// Credential extraction and identity lookup settings.
    #[serde(default)]
    pub auth: AuthSection,

    /// Identity store settings.
    #[serde(default)]
    pub storage: StorageSection,

    /// Logging settings.
    #[serde(default)]
    pub log: LogSection,
}

/// SSO gateway connection configuration.
///
/// `host` and `secret` have no usable defaults; validation rejects a config
/// that leaves them unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    /// Gateway hostname or IP address. Also the second input to uid synthesis.
    #[serde(default)]
    pub host: String,

    /// Gateway UDP port.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Shared secret for the gateway exchange. `None` fails validation.
    #[serde(default)]
    pub secret: Option<String>,

    /// Seconds to wait for a reply to each request before retrying.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional send attempts after the first request goes unanswered.
    #[serde(default)]
    pub retries: u32,

    /// Path to a FreeRADIUS-format dictionary file merged over the built-in
    /// attribute names. `None` uses the built-in dictionary alone.
    #[serde(default)]
    pub dictionary: Option<String>,

    /// Treat a gateway timeout as a failed authentication instead of an error.
    #[serde(default)]
    pub timeout_as_failure: bool,

    /// Value sent as the NAS-Identifier attribute in each request.
    #[serde(default = "default_nas_identifier")]
    pub nas_identifier: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_gateway_port(),
            secret: None,
            timeout_secs: default_timeout_secs(),
            retries: 0,
            dictionary: None,
            timeout_as_failure: false,
            nas_identifier: default_nas_identifier(),
        }
    }
}

fn default_gateway_port() -> u16 {
    1812
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_nas_identifier() -> String {
    "sealgate".to_string()
}

/// Credential extraction and identity lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    /// Recognized authentication keys; the first one is the username field.
    #[serde(default = "default_authentication_keys")]
    pub authentication_keys: Vec<String>,

    /// Keys whose extracted value is lowercased before use.
    #[serde(default = "default_case_insensitive_keys")]
    pub case_insensitive_keys: Vec<String>,

    /// Identity column the attempt is matched against (`uid` or `username`).
    #[serde(default = "default_uid_field")]
    pub uid_field: String,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            authentication_keys: default_authentication_keys(),
            case_insensitive_keys: default_case_insensitive_keys(),
            uid_field: default_uid_field(),
        }
    }
}

fn default_authentication_keys() -> Vec<String> {
    vec!["username".to_string()]
}

fn default_case_insensitive_keys() -> Vec<String> {
    vec!["username".to_string()]
}

fn default_uid_field() -> String {
    "uid".to_string()
}

/// Identity store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sealgate").join("sealgate.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sealgate.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
