// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential extraction from authentication attempts.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::AuthAttempt;

/// Key under which the attempt carries the password. Not configurable.
pub const PASSWORD_KEY: &str = "password";

/// Extracted credentials, ready for the gateway exchange.
pub struct Credentials {
    /// Username as the gateway will see it. Empty when the attempt carried
    /// none of the configured keys.
    pub username: String,
    pub password: SecretString,
}

/// Controls which attempt key yields the username and how it is folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionPolicy {
    /// Recognized authentication keys, in configured order. Only the first
    /// one is consulted; the rest exist for callers that rotate the order
    /// per identity type.
    pub authentication_keys: Vec<String>,
    /// Keys whose extracted value is lowercased before use.
    pub case_insensitive_keys: Vec<String>,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        ExtractionPolicy {
            authentication_keys: vec!["username".to_string()],
            case_insensitive_keys: vec!["username".to_string()],
        }
    }
}

impl ExtractionPolicy {
    /// Pulls username and password out of an attempt.
    ///
    /// Single-key extraction: only the first configured key is consulted,
    /// even when the attempt carries values under later keys. A missing
    /// username or password extracts as empty rather than failing; the
    /// gateway is the authority on whether empty credentials pass.
    pub fn extract(&self, attempt: &AuthAttempt) -> Credentials {
        let username = match self.authentication_keys.first() {
            Some(key) => {
                let value = attempt.get(key).unwrap_or_default();
                if self.case_insensitive_keys.contains(key) {
                    value.to_lowercase()
                } else {
                    value.to_string()
                }
            }
            None => String::new(),
        };
        let password = attempt.get(PASSWORD_KEY).unwrap_or_default().to_string();
        Credentials {
            username,
            password: SecretString::from(password),
        }
    }
}
