// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sealgate authentication adapter.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across all Sealgate adapter traits and core operations.
///
/// Rejected authentication is not an error: the resolver reports it as an
/// absent outcome. Errors here are fatal for the attempt that hit them.
#[derive(Debug, Error)]
pub enum SealgateError {
    /// Configuration errors (missing required options, invalid values).
    /// Surfaced at setup time or first use, never per attempt.
    #[error("configuration error: {0}")]
    Config(String),

    /// The gateway did not reply within the configured timeout across all
    /// send attempts.
    #[error("gateway timed out after {attempts} attempt(s) of {timeout:?}")]
    GatewayTimeout {
        /// Per-attempt reply timeout that elapsed.
        timeout: Duration,
        /// Total send attempts made (1 + configured retries).
        attempts: u32,
    },

    /// Gateway transport or protocol errors (socket failure, malformed reply,
    /// response authenticator mismatch). Kept distinct from
    /// [`SealgateError::GatewayTimeout`] so the timeout-as-failure policy
    /// never swallows them.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Identity store errors (database connection, query failure, failed save).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SealgateError {
    /// Shorthand for a gateway error with no underlying source.
    pub fn gateway(message: impl Into<String>) -> Self {
        SealgateError::Gateway {
            message: message.into(),
            source: None,
        }
    }
}
