// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway authenticator trait.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::SealgateError;
use crate::traits::PluginAdapter;
use crate::types::GatewayReply;

/// Validates a username/password pair against the SSO gateway.
#[async_trait]
pub trait GatewayAuthenticator: PluginAdapter {
    /// Submits the credentials and returns the gateway's decoded reply.
    ///
    /// A reject is a successful call with a non-accept [`GatewayReply`];
    /// errors mean the exchange itself failed. Timeouts surface as
    /// [`SealgateError::GatewayTimeout`] so callers can apply the
    /// timeout-as-failure policy.
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<GatewayReply, SealgateError>;
}
