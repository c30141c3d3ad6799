// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sealgate integration tests.
//!
//! This crate provides reusable test doubles so that integration tests can
//! exercise the resolver and the RADIUS client without a real WebSEAL
//! deployment:
//!
//! - [`MockGateway`]: a scripted [`GatewayAuthenticator`] that replays
//!   canned replies and records every credential pair it was asked to check.
//! - [`MemoryIdentityStore`]: an in-memory [`IdentityStore`] with the same
//!   upsert semantics as the SQLite adapter.
//! - [`ScriptedRadiusServer`]: a real UDP listener that speaks just enough
//!   of the wire protocol to drive the client through accept, reject,
//!   timeout and tamper scenarios.
//!
//! [`GatewayAuthenticator`]: sealgate_core::GatewayAuthenticator
//! [`IdentityStore`]: sealgate_core::IdentityStore

pub mod memory_store;
pub mod mock_gateway;
pub mod radius_server;

pub use memory_store::MemoryIdentityStore;
pub use mock_gateway::{MockGateway, ScriptedReply};
pub use radius_server::{GatewayBehavior, ObservedRequest, ScriptedRadiusServer};
