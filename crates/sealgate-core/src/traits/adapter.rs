// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by all adapters.

use async_trait::async_trait;
use semver::Version;

use crate::error::SealgateError;
use crate::types::{AdapterType, HealthStatus};

/// Base trait for all Sealgate adapters.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// behind `Arc<dyn _>` across async tasks.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Unique adapter name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Adapter version.
    fn version(&self) -> Version;

    /// Which role this adapter fills.
    fn adapter_type(&self) -> AdapterType;

    /// Probes whether the adapter can currently serve requests.
    async fn health_check(&self) -> Result<HealthStatus, SealgateError>;

    /// Releases held resources. Called once during teardown; implementations
    /// must tolerate being called before first use.
    async fn shutdown(&self) -> Result<(), SealgateError>;
}
