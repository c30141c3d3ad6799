// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types and traits for Sealgate.
//!
//! Sealgate validates credentials against a WebSEAL-style SSO gateway and
//! reconciles each accepted login with a locally persisted identity record.
//! This crate defines the adapter traits ([`GatewayAuthenticator`],
//! [`IdentityStore`]), the shared data model, and the
//! [`AuthenticationResolver`] that orchestrates an attempt end to end.
//! Concrete adapters live in their own crates and plug in behind the traits.

pub mod credentials;
pub mod error;
pub mod resolver;
pub mod traits;
pub mod types;
pub mod uid;

pub use credentials::{Credentials, ExtractionPolicy, PASSWORD_KEY};
pub use error::SealgateError;
pub use resolver::{AuthenticationResolver, ResolverSettings};
pub use traits::{
    GatewayAuthenticator, IdentityStore, PersistWithoutValidation, PluginAdapter, PostAuthHook,
};
pub use types::{
    AdapterType, AuthAttempt, GatewayReply, HealthStatus, IdentityField, IdentityRecord, ReplyCode,
    now_rfc3339,
};
pub use uid::{DefaultUidGenerator, UidGenerator};
