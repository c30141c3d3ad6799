// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attribute dictionary for naming and rendering reply attributes.
//!
//! Ships a baseline of common RFC 2865 attributes and can merge a
//! FreeRADIUS-format dictionary file over it. Only plain `ATTRIBUTE` records
//! with single-octet ids are consumed; vendor blocks, `VALUE` records, and
//! extended ids are skipped.

use std::collections::HashMap;
use std::path::Path;

use sealgate_core::SealgateError;

/// How an attribute's octets render to a display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// UTF-8 text; falls back to hex when the octets are not valid UTF-8.
    Text,
    /// 32-bit big-endian unsigned integer, rendered decimal.
    Integer,
    /// IPv4 address, rendered dotted-quad.
    IpAddr,
    /// Raw octets, rendered `0x`-prefixed hex.
    Octets,
}

impl AttributeKind {
    /// FreeRADIUS type column to kind. `date` is seconds since the epoch and
    /// renders as an integer; unrecognized types fall back to raw octets.
    fn from_freeradius(name: &str) -> Self {
        match name {
            "string" | "text" => AttributeKind::Text,
            "integer" | "date" => AttributeKind::Integer,
            "ipaddr" => AttributeKind::IpAddr,
            _ => AttributeKind::Octets,
        }
    }
}

#[derive(Debug, Clone)]
struct AttributeDef {
    name: String,
    kind: AttributeKind,
}

/// Maps attribute ids to names and render kinds.
#[derive(Debug, Clone)]
pub struct Dictionary {
    attrs: HashMap<u8, AttributeDef>,
}

impl Dictionary {
    /// The built-in RFC 2865 baseline.
    pub fn baseline() -> Self {
        let mut dict = Dictionary {
            attrs: HashMap::new(),
        };
        for &(id, name, kind) in BASELINE {
            dict.define(id, name, kind);
        }
        dict
    }

    /// Baseline plus a FreeRADIUS-format dictionary file merged over it.
    pub fn with_file(path: &Path) -> Result<Self, SealgateError> {
        let mut dict = Dictionary::baseline();
        dict.load_file(path)?;
        Ok(dict)
    }

    /// Merge `ATTRIBUTE name id type` records from a FreeRADIUS-format file.
    /// Later definitions win over earlier ones and over the baseline.
    pub fn load_file(&mut self, path: &Path) -> Result<(), SealgateError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SealgateError::Config(format!(
                "cannot read dictionary file {}: {e}",
                path.display()
            ))
        })?;
        self.load_str(&content);
        Ok(())
    }

    fn load_str(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            let mut fields = line.split_whitespace();
            if fields.next() != Some("ATTRIBUTE") {
                continue;
            }
            let (Some(name), Some(id), Some(kind)) =
                (fields.next(), fields.next(), fields.next())
            else {
                continue;
            };
            // Extended and vendor ids (values over 255, dotted notation) are
            // outside the subset this client speaks.
            let Ok(id) = id.parse::<u8>() else {
                continue;
            };
            self.define(id, name, AttributeKind::from_freeradius(kind));
        }
    }

    fn define(&mut self, id: u8, name: &str, kind: AttributeKind) {
        self.attrs.insert(
            id,
            AttributeDef {
                name: name.to_string(),
                kind,
            },
        );
    }

    /// Number of attribute definitions currently known.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Display name for an attribute id; unknown ids get `Attr-{id}`.
    pub fn name_of(&self, id: u8) -> String {
        match self.attrs.get(&id) {
            Some(def) => def.name.clone(),
            None => format!("Attr-{id}"),
        }
    }

    /// Render an attribute value per its dictionary kind. Values that do not
    /// fit their declared kind fall back to hex rather than erroring; reply
    /// attributes are diagnostic data, not protocol state.
    pub fn decode_value(&self, id: u8, value: &[u8]) -> String {
        let kind = self
            .attrs
            .get(&id)
            .map(|def| def.kind)
            .unwrap_or(AttributeKind::Octets);
        match kind {
            AttributeKind::Text => match std::str::from_utf8(value) {
                Ok(text) => text.to_string(),
                Err(_) => hex_render(value),
            },
            AttributeKind::Integer => match <[u8; 4]>::try_from(value) {
                Ok(bytes) => u32::from_be_bytes(bytes).to_string(),
                Err(_) => hex_render(value),
            },
            AttributeKind::IpAddr => match <[u8; 4]>::try_from(value) {
                Ok(bytes) => std::net::Ipv4Addr::from(bytes).to_string(),
                Err(_) => hex_render(value),
            },
            AttributeKind::Octets => hex_render(value),
        }
    }
}

fn hex_render(value: &[u8]) -> String {
    format!("0x{}", hex::encode(value))
}

/// Common RFC 2865 attributes a WebSEAL-style gateway replies with.
const BASELINE: &[(u8, &str, AttributeKind)] = &[
    (1, "User-Name", AttributeKind::Text),
    (2, "User-Password", AttributeKind::Octets),
    (4, "NAS-IP-Address", AttributeKind::IpAddr),
    (5, "NAS-Port", AttributeKind::Integer),
    (6, "Service-Type", AttributeKind::Integer),
    (7, "Framed-Protocol", AttributeKind::Integer),
    (8, "Framed-IP-Address", AttributeKind::IpAddr),
    (11, "Filter-Id", AttributeKind::Text),
    (12, "Framed-MTU", AttributeKind::Integer),
    (18, "Reply-Message", AttributeKind::Text),
    (25, "Class", AttributeKind::Octets),
    (26, "Vendor-Specific", AttributeKind::Octets),
    (27, "Session-Timeout", AttributeKind::Integer),
    (28, "Idle-Timeout", AttributeKind::Integer),
    (29, "Termination-Action", AttributeKind::Integer),
    (30, "Called-Station-Id", AttributeKind::Text),
    (31, "Calling-Station-Id", AttributeKind::Text),
    (32, "NAS-Identifier", AttributeKind::Text),
    (33, "Proxy-State", AttributeKind::Octets),
    (61, "NAS-Port-Type", AttributeKind::Integer),
    (79, "EAP-Message", AttributeKind::Octets),
    (80, "Message-Authenticator", AttributeKind::Octets),
    (85, "Acct-Interim-Interval", AttributeKind::Integer),
];
