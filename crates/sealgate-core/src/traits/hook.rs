// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-authentication hook.

use async_trait::async_trait;

use crate::error::SealgateError;
use crate::traits::IdentityStore;
use crate::types::IdentityRecord;

/// Runs after the gateway accepts, before the record is returned.
///
/// The default hook persists the record; deployments can layer provisioning
/// or attribute mapping here instead.
#[async_trait]
pub trait PostAuthHook: Send + Sync + 'static {
    /// Receives the resolved record with `webseal_attributes` populated.
    /// Mutations made here are visible to the caller.
    async fn after_authentication(
        &self,
        record: &mut IdentityRecord,
        store: &dyn IdentityStore,
    ) -> Result<(), SealgateError>;
}

/// Default hook: saves the record with validation disabled, so partially
/// populated identities (for example a missing username) still persist.
#[derive(Debug, Default)]
pub struct PersistWithoutValidation;

#[async_trait]
impl PostAuthHook for PersistWithoutValidation {
    async fn after_authentication(
        &self,
        record: &mut IdentityRecord,
        store: &dyn IdentityStore,
    ) -> Result<(), SealgateError> {
        store.save(record, false).await
    }
}
