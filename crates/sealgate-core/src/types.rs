// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared types used across Sealgate crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Adapter plumbing ---

/// Adapter categories recognized by the plugin registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdapterType {
    /// Authenticates credentials against the SSO gateway.
    Gateway,
    /// Persists identity records locally.
    Store,
}

/// Result of an adapter health probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter works but reported a concern.
    Degraded(String),
    /// Adapter cannot serve requests.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

// --- Authentication attempt ---

/// An incoming authentication attempt as an ordered list of key/value pairs.
///
/// Order is preserved as submitted and duplicate keys are allowed; lookups
/// read the first value stored under a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthAttempt {
    pairs: Vec<(String, String)>,
}

impl AuthAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, or replaces the value in place if the exact key is
    /// already present. Submission order of first appearance is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// First value stored under the exact key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AuthAttempt {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        AuthAttempt {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for AuthAttempt {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

// --- Gateway reply ---

/// Outcome code of a gateway authentication exchange.
#[derive(Debug, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum ReplyCode {
    #[strum(serialize = "Access-Accept")]
    #[serde(rename = "Access-Accept")]
    AccessAccept,
    #[strum(serialize = "Access-Reject")]
    #[serde(rename = "Access-Reject")]
    AccessReject,
    #[strum(serialize = "Access-Challenge")]
    #[serde(rename = "Access-Challenge")]
    AccessChallenge,
    /// Any other packet code, kept verbatim for logging.
    #[strum(default)]
    #[serde(untagged)]
    Other(String),
}

/// A decoded reply from the SSO gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReply {
    pub code: ReplyCode,
    /// Reply attributes by dictionary name, decoded to display strings.
    pub attributes: BTreeMap<String, String>,
}

impl GatewayReply {
    pub fn accept(attributes: BTreeMap<String, String>) -> Self {
        GatewayReply {
            code: ReplyCode::AccessAccept,
            attributes,
        }
    }

    pub fn reject() -> Self {
        GatewayReply {
            code: ReplyCode::AccessReject,
            attributes: BTreeMap::new(),
        }
    }

    /// Whether the gateway accepted the credentials. Everything else,
    /// including challenges, counts as not authenticated.
    pub fn is_accept(&self) -> bool {
        self.code == ReplyCode::AccessAccept
    }
}

// --- Identity records ---

/// Which identity column an attempt's username is matched against.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    /// Match against the synthesized unique identifier.
    #[default]
    Uid,
    /// Match against the stored username.
    Username,
}

/// A locally persisted identity, reconciled on each successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable unique identifier, synthesized from username and gateway host.
    pub uid: String,
    pub username: Option<String>,
    /// RFC 3339 UTC timestamp of first persistence.
    pub created_at: String,
    /// RFC 3339 UTC timestamp of last persistence.
    pub updated_at: String,
    /// Attributes from the most recent gateway accept. Never persisted;
    /// valid only for the lifetime of the resolved record.
    #[serde(skip)]
    pub webseal_attributes: BTreeMap<String, String>,
}

impl IdentityRecord {
    /// Fresh record keyed by uid, with timestamps set to now.
    pub fn build(uid: impl Into<String>) -> Self {
        let now = now_rfc3339();
        IdentityRecord {
            uid: uid.into(),
            username: None,
            created_at: now.clone(),
            updated_at: now,
            webseal_attributes: BTreeMap::new(),
        }
    }

    /// Fresh record for a lookup that missed. The value lands in the column
    /// the lookup used; uid is always populated.
    pub fn build_for(field: IdentityField, uid: impl Into<String>, value: &str) -> Self {
        let mut record = IdentityRecord::build(uid);
        if field == IdentityField::Username {
            record.username = Some(value.to_string());
        }
        record
    }
}

/// Current UTC time formatted as RFC 3339 with millisecond precision,
/// matching the store's SQL-side timestamp format.
pub fn now_rfc3339() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
