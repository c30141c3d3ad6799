// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Every pluggable component implements [`PluginAdapter`] plus one of the
//! role traits. The resolver only ever sees the traits, so gateways and
//! stores can be swapped without touching core logic.

mod adapter;
mod gateway;
mod hook;
mod store;

pub use adapter::PluginAdapter;
pub use gateway::GatewayAuthenticator;
pub use hook::{PersistWithoutValidation, PostAuthHook};
pub use store::IdentityStore;
