// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted gateway adapter for tests that do not need a network.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sealgate_core::{
    AdapterType, GatewayAuthenticator, GatewayReply, HealthStatus, PluginAdapter, SealgateError,
};
use secrecy::{ExposeSecret, SecretString};
use semver::Version;
use tokio::sync::Mutex;

/// One canned outcome for a single `authenticate` call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Access-Accept carrying the given decision attributes.
    Accept(BTreeMap<String, String>),
    /// Access-Reject.
    Reject,
    /// Access-Challenge, which the resolver treats as not authenticated.
    Challenge,
    /// The gateway never answered within the deadline.
    Timeout,
    /// A transport failure such as a socket error.
    TransportError(String),
}

/// Scripted implementation of [`GatewayAuthenticator`].
///
/// Replies are consumed front to back; once the script runs out every
/// further call is rejected. All credential pairs presented to the mock are
/// recorded and can be inspected with [`MockGateway::calls`].
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock primed with the given replies.
    pub fn with_replies(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Appends one reply to the script.
    pub async fn push_reply(&self, reply: ScriptedReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Returns every `(username, password)` pair presented so far.
    pub async fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().await.clone()
    }

    async fn next_reply(&self) -> ScriptedReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(ScriptedReply::Reject)
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, SealgateError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SealgateError> {
        Ok(())
    }
}

#[async_trait]
impl GatewayAuthenticator for MockGateway {
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<GatewayReply, SealgateError> {
        self.calls
            .lock()
            .await
            .push((username.to_string(), password.expose_secret().to_string()));

        match self.next_reply().await {
            ScriptedReply::Accept(attributes) => Ok(GatewayReply::accept(attributes)),
            ScriptedReply::Reject => Ok(GatewayReply::reject()),
            ScriptedReply::Challenge => Ok(GatewayReply {
                code: sealgate_core::ReplyCode::AccessChallenge,
                attributes: BTreeMap::new(),
            }),
            ScriptedReply::Timeout => Err(SealgateError::GatewayTimeout {
                timeout: Duration::from_secs(1),
                attempts: 1,
            }),
            ScriptedReply::TransportError(message) => Err(SealgateError::Gateway {
                message,
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let gateway = MockGateway::with_replies(vec![ScriptedReply::Accept(BTreeMap::new())]);
        gateway.push_reply(ScriptedReply::Reject).await;

        let password = SecretString::from("pw");
        let first = gateway.authenticate("alice", &password).await.unwrap();
        let second = gateway.authenticate("alice", &password).await.unwrap();

        assert!(first.is_accept());
        assert!(!second.is_accept());
    }

    #[tokio::test]
    async fn challenge_reply_is_not_an_accept() {
        let gateway = MockGateway::with_replies(vec![ScriptedReply::Challenge]);
        let reply = gateway
            .authenticate("erin", &SecretString::from("pw"))
            .await
            .unwrap();
        assert!(!reply.is_accept());
        assert_eq!(reply.code, sealgate_core::ReplyCode::AccessChallenge);
    }

    #[tokio::test]
    async fn exhausted_script_falls_back_to_reject() {
        let gateway = MockGateway::new();
        let reply = gateway
            .authenticate("bob", &SecretString::from("pw"))
            .await
            .unwrap();
        assert!(!reply.is_accept());
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let gateway = MockGateway::new();
        let _ = gateway
            .authenticate("carol", &SecretString::from("hunter2"))
            .await;

        let calls = gateway.calls().await;
        assert_eq!(calls, vec![("carol".to_string(), "hunter2".to_string())]);
    }

    #[tokio::test]
    async fn scripted_timeout_surfaces_as_error() {
        let gateway = MockGateway::with_replies(vec![ScriptedReply::Timeout]);
        let err = gateway
            .authenticate("dave", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, SealgateError::GatewayTimeout { .. }));
    }
}
