// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Uid synthesis.

/// Derives the stable unique identifier for a username at a gateway.
///
/// Implemented for any `Fn(&str, &str) -> String`, so deployments can pass a
/// closure instead of a type.
pub trait UidGenerator: Send + Sync + 'static {
    /// Must be deterministic: the same inputs always map to the same uid,
    /// including an empty username.
    fn uid(&self, username: &str, gateway: &str) -> String;
}

impl<F> UidGenerator for F
where
    F: Fn(&str, &str) -> String + Send + Sync + 'static,
{
    fn uid(&self, username: &str, gateway: &str) -> String {
        self(username, gateway)
    }
}

/// Default scheme: `username@gateway`.
#[derive(Debug, Default)]
pub struct DefaultUidGenerator;

impl UidGenerator for DefaultUidGenerator {
    fn uid(&self, username: &str, gateway: &str) -> String {
        format!("{username}@{gateway}")
    }
}
