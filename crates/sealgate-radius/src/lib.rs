// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RADIUS gateway client adapter.
//!
//! Implements [`GatewayAuthenticator`] over UDP: one Access-Request per
//! attempt with PAP password hiding, bounded retransmission with the same
//! identifier and request authenticator, and reply verification against the
//! shared secret. Reply attributes are named through [`Dictionary`].

pub mod dictionary;
pub mod packet;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

use sealgate_config::model::GatewaySection;
use sealgate_core::{
    AdapterType, GatewayAuthenticator, GatewayReply, HealthStatus, PluginAdapter, ReplyCode,
    SealgateError,
};

pub use dictionary::Dictionary;
use packet::ResponsePacket;

/// Immutable connection parameters for one gateway.
///
/// Built once from the `[gateway]` config section and shared read-only.
#[derive(Clone)]
pub struct RadiusClientConfig {
    pub host: String,
    pub port: u16,
    pub secret: SecretString,
    /// Per-attempt reply timeout.
    pub timeout: Duration,
    /// Retransmissions after the first unanswered request.
    pub retries: u32,
    pub dictionary: Option<PathBuf>,
    pub nas_identifier: String,
}

impl RadiusClientConfig {
    /// Build from the validated config section. Still refuses a missing
    /// secret or host so direct construction cannot skip the requirement.
    pub fn from_section(section: &GatewaySection) -> Result<Self, SealgateError> {
        if section.host.trim().is_empty() {
            return Err(SealgateError::Config(
                "gateway.host is not configured".to_string(),
            ));
        }
        let secret = section
            .secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SealgateError::Config("gateway.secret is not configured".to_string()))?;

        Ok(RadiusClientConfig {
            host: section.host.clone(),
            port: section.port,
            secret: SecretString::from(secret.to_string()),
            timeout: Duration::from_secs(section.timeout_secs),
            retries: section.retries,
            dictionary: section.dictionary.clone().map(PathBuf::from),
            nas_identifier: section.nas_identifier.clone(),
        })
    }
}

impl std::fmt::Debug for RadiusClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadiusClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"[redacted]")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("dictionary", &self.dictionary)
            .field("nas_identifier", &self.nas_identifier)
            .finish()
    }
}

/// UDP RADIUS client implementing the gateway seam.
///
/// Each `authenticate` call uses its own ephemeral socket, so concurrent
/// attempts never interleave replies.
#[derive(Debug)]
pub struct RadiusClient {
    config: RadiusClientConfig,
    dictionary: Dictionary,
    next_identifier: AtomicU8,
}

impl RadiusClient {
    /// Build a client from the `[gateway]` config section, loading the
    /// dictionary file when one is configured.
    pub fn new(section: &GatewaySection) -> Result<Self, SealgateError> {
        Self::with_config(RadiusClientConfig::from_section(section)?)
    }

    /// Build a client from an already-assembled config.
    pub fn with_config(config: RadiusClientConfig) -> Result<Self, SealgateError> {
        let dictionary = match &config.dictionary {
            Some(path) => Dictionary::with_file(path)?,
            None => Dictionary::baseline(),
        };
        Ok(RadiusClient {
            config,
            dictionary,
            next_identifier: AtomicU8::new(rand::random()),
        })
    }

    pub fn config(&self) -> &RadiusClientConfig {
        &self.config
    }

    /// One full exchange: send the request up to `1 + retries` times, each
    /// send waiting `timeout` for a matching reply.
    async fn exchange(
        &self,
        request: &[u8],
        identifier: u8,
        authenticator: &[u8; 16],
    ) -> Result<ResponsePacket, SealgateError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0)).await.map_err(|e| {
            SealgateError::Gateway {
                message: format!("cannot bind local socket: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        socket
            .connect((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|e| SealgateError::Gateway {
                message: format!(
                    "cannot reach gateway {}:{}: {e}",
                    self.config.host, self.config.port
                ),
                source: Some(Box::new(e)),
            })?;

        let attempts = self.config.retries + 1;
        for attempt in 1..=attempts {
            if attempt > 1 {
                warn!(
                    attempt,
                    host = %self.config.host,
                    "gateway silent, retransmitting access request"
                );
            }
            socket
                .send(request)
                .await
                .map_err(|e| SealgateError::Gateway {
                    message: format!("send to gateway failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            if let Some(reply) = self.await_reply(&socket, identifier, authenticator).await? {
                return Ok(reply);
            }
        }

        Err(SealgateError::GatewayTimeout {
            timeout: self.config.timeout,
            attempts,
        })
    }

    /// Wait out one attempt window. `Ok(None)` means the window elapsed with
    /// no usable reply; datagrams answering a different identifier are
    /// ignored, while malformed or unverifiable replies abort the exchange.
    async fn await_reply(
        &self,
        socket: &UdpSocket,
        identifier: u8,
        authenticator: &[u8; 16],
    ) -> Result<Option<ResponsePacket>, SealgateError> {
        let deadline = Instant::now() + self.config.timeout;
        let mut buf = [0u8; packet::MAX_PACKET_LEN];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }
            let received = match tokio::time::timeout(remaining, socket.recv(&mut buf)).await {
                Err(_) => return Ok(None),
                Ok(Err(e)) => {
                    return Err(SealgateError::Gateway {
                        message: format!("receive from gateway failed: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
                Ok(Ok(len)) => &buf[..len],
            };

            let reply = packet::decode_response(received)?;
            if reply.identifier != identifier {
                debug!(
                    got = reply.identifier,
                    expected = identifier,
                    "ignoring reply for a different request"
                );
                continue;
            }
            packet::verify_response_authenticator(
                received,
                authenticator,
                self.config.secret.expose_secret().as_bytes(),
            )?;
            return Ok(Some(reply));
        }
    }

    /// Decode a verified reply into the adapter-level result.
    fn reply_from_packet(&self, reply: ResponsePacket) -> GatewayReply {
        let code = match reply.code {
            packet::CODE_ACCESS_ACCEPT => ReplyCode::AccessAccept,
            packet::CODE_ACCESS_REJECT => ReplyCode::AccessReject,
            packet::CODE_ACCESS_CHALLENGE => ReplyCode::AccessChallenge,
            other => ReplyCode::Other(format!("Code-{other}")),
        };

        let mut attributes: BTreeMap<String, String> = BTreeMap::new();
        for (id, value) in &reply.attributes {
            let name = self.dictionary.name_of(*id);
            let rendered = self.dictionary.decode_value(*id, value);
            attributes
                .entry(name)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&rendered);
                })
                .or_insert(rendered);
        }

        GatewayReply { code, attributes }
    }
}

#[async_trait]
impl PluginAdapter for RadiusClient {
    fn name(&self) -> &str {
        "radius-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    /// Binds and connects a throwaway socket. Catches unresolvable hosts and
    /// unroutable addresses; a silent-but-reachable gateway still probes
    /// healthy, UDP cannot tell those apart without credentials.
    async fn health_check(&self) -> Result<HealthStatus, SealgateError> {
        let socket = match UdpSocket::bind(("0.0.0.0", 0)).await {
            Ok(socket) => socket,
            Err(e) => return Ok(HealthStatus::Unhealthy(format!("cannot bind socket: {e}"))),
        };
        match socket
            .connect((self.config.host.as_str(), self.config.port))
            .await
        {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "cannot reach {}:{}: {e}",
                self.config.host, self.config.port
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), SealgateError> {
        Ok(())
    }
}

#[async_trait]
impl GatewayAuthenticator for RadiusClient {
    async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<GatewayReply, SealgateError> {
        let identifier = self.next_identifier.fetch_add(1, Ordering::Relaxed);
        let authenticator: [u8; 16] = rand::random();
        let request = packet::encode_access_request(
            identifier,
            &authenticator,
            username,
            password.expose_secret().as_bytes(),
            self.config.secret.expose_secret().as_bytes(),
            &self.config.nas_identifier,
        )?;

        debug!(
            username,
            identifier,
            host = %self.config.host,
            port = self.config.port,
            "sending access request"
        );
        let reply = self.exchange(&request, identifier, &authenticator).await?;
        let reply = self.reply_from_packet(reply);
        debug!(username, code = %reply.code, "gateway replied");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RadiusClientConfig {
        RadiusClientConfig {
            host: "127.0.0.1".to_string(),
            port: 1812,
            secret: SecretString::from("radius-secret"),
            timeout: Duration::from_millis(100),
            retries: 0,
            dictionary: None,
            nas_identifier: "sealgate".to_string(),
        }
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let rendered = format!("{:?}", test_config());
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("radius-secret"));
    }

    #[test]
    fn from_section_requires_secret() {
        let section = GatewaySection {
            host: "sso.example.com".to_string(),
            ..GatewaySection::default()
        };
        let err = RadiusClientConfig::from_section(&section).unwrap_err();
        assert!(matches!(err, SealgateError::Config(_)));
    }

    #[test]
    fn from_section_requires_host() {
        let section = GatewaySection {
            secret: Some("radius-secret".to_string()),
            ..GatewaySection::default()
        };
        let err = RadiusClientConfig::from_section(&section).unwrap_err();
        assert!(matches!(err, SealgateError::Config(_)));
    }

    #[test]
    fn from_section_carries_all_fields() {
        let section = GatewaySection {
            host: "sso.example.com".to_string(),
            port: 1645,
            secret: Some("radius-secret".to_string()),
            timeout_secs: 5,
            retries: 2,
            dictionary: Some("/etc/sealgate/dictionary".to_string()),
            timeout_as_failure: true,
            nas_identifier: "portal-1".to_string(),
        };
        let config = RadiusClientConfig::from_section(&section).unwrap();
        assert_eq!(config.host, "sso.example.com");
        assert_eq!(config.port, 1645);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retries, 2);
        assert_eq!(
            config.dictionary.as_deref(),
            Some(std::path::Path::new("/etc/sealgate/dictionary"))
        );
        assert_eq!(config.nas_identifier, "portal-1");
    }

    #[test]
    fn reply_mapping_names_attributes_and_strips_nothing_but_code() {
        let client = RadiusClient::with_config(test_config()).unwrap();
        let reply = client.reply_from_packet(ResponsePacket {
            code: packet::CODE_ACCESS_ACCEPT,
            identifier: 1,
            attributes: vec![
                (packet::ATTR_SESSION_TIMEOUT, vec![0, 0, 0x0e, 0x10]),
                (packet::ATTR_REPLY_MESSAGE, b"welcome".to_vec()),
            ],
        });
        assert_eq!(reply.code, ReplyCode::AccessAccept);
        assert_eq!(
            reply.attributes.get("Session-Timeout").map(String::as_str),
            Some("3600")
        );
        assert_eq!(
            reply.attributes.get("Reply-Message").map(String::as_str),
            Some("welcome")
        );
    }

    #[test]
    fn repeated_attributes_are_joined() {
        let client = RadiusClient::with_config(test_config()).unwrap();
        let reply = client.reply_from_packet(ResponsePacket {
            code: packet::CODE_ACCESS_REJECT,
            identifier: 1,
            attributes: vec![
                (packet::ATTR_REPLY_MESSAGE, b"expired".to_vec()),
                (packet::ATTR_REPLY_MESSAGE, b"contact helpdesk".to_vec()),
            ],
        });
        assert_eq!(
            reply.attributes.get("Reply-Message").map(String::as_str),
            Some("expired, contact helpdesk")
        );
    }

    #[test]
    fn unfamiliar_code_maps_to_other() {
        let client = RadiusClient::with_config(test_config()).unwrap();
        let reply = client.reply_from_packet(ResponsePacket {
            code: 40,
            identifier: 1,
            attributes: vec![],
        });
        assert_eq!(reply.code, ReplyCode::Other("Code-40".to_string()));
        assert!(!reply.is_accept());
    }
}
