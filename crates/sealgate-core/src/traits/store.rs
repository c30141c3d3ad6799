// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity store trait.

use async_trait::async_trait;

use crate::error::SealgateError;
use crate::traits::PluginAdapter;
use crate::types::{IdentityField, IdentityRecord};

/// Persists identity records keyed by uid.
///
/// Implementations must treat uid as unique: concurrent saves of the same
/// uid converge on a single record rather than erroring or duplicating.
#[async_trait]
pub trait IdentityStore: PluginAdapter {
    /// Prepares the store for use (opens connections, runs migrations).
    async fn initialize(&self) -> Result<(), SealgateError>;

    /// Looks up a single record where `field` equals `value`.
    async fn find_one_by(
        &self,
        field: IdentityField,
        value: &str,
    ) -> Result<Option<IdentityRecord>, SealgateError>;

    /// Inserts the record, or updates the existing row with the same uid.
    /// `created_at` survives updates; `updated_at` is refreshed by the store.
    ///
    /// `validate` requests full record validation before writing. Stores
    /// without validation rules may ignore it.
    async fn save(&self, record: &IdentityRecord, validate: bool) -> Result<(), SealgateError>;

    /// Flushes and closes the store. Idempotent.
    async fn close(&self) -> Result<(), SealgateError>;
}
