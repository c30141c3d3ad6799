// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory identity store with the same upsert semantics as the SQLite
//! adapter.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use sealgate_core::{
    AdapterType, HealthStatus, IdentityField, IdentityRecord, IdentityStore, PluginAdapter,
    SealgateError, now_rfc3339,
};
use semver::Version;
use tokio::sync::Mutex;

/// [`IdentityStore`] backed by a `HashMap`, keyed by uid.
///
/// Matches the persistence rules of the real store: `created_at` survives
/// updates, `updated_at` is refreshed on every save and gateway decision
/// attributes are never persisted. Every save is logged with its `validate`
/// flag for later inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    rows: Arc<Mutex<HashMap<String, IdentityRecord>>>,
    saves: Arc<Mutex<Vec<(String, bool)>>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record directly, bypassing the save log.
    pub async fn seed(&self, record: IdentityRecord) {
        self.rows.lock().await.insert(record.uid.clone(), record);
    }

    /// Returns `(uid, validate)` for every save in order.
    pub async fn saves(&self) -> Vec<(String, bool)> {
        self.saves.lock().await.clone()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for MemoryIdentityStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, SealgateError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SealgateError> {
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn initialize(&self) -> Result<(), SealgateError> {
        Ok(())
    }

    async fn find_one_by(
        &self,
        field: IdentityField,
        value: &str,
    ) -> Result<Option<IdentityRecord>, SealgateError> {
        let rows = self.rows.lock().await;
        let found = match field {
            IdentityField::Uid => rows.get(value).cloned(),
            IdentityField::Username => rows
                .values()
                .find(|record| record.username.as_deref() == Some(value))
                .cloned(),
        };
        Ok(found)
    }

    async fn save(&self, record: &IdentityRecord, validate: bool) -> Result<(), SealgateError> {
        let mut rows = self.rows.lock().await;
        let mut stored = record.clone();
        // Decision attributes are transient and never written to disk.
        stored.webseal_attributes = BTreeMap::new();
        stored.updated_at = now_rfc3339();
        if let Some(existing) = rows.get(&record.uid) {
            stored.created_at = existing.created_at.clone();
        }
        rows.insert(stored.uid.clone(), stored);
        drop(rows);

        self.saves.lock().await.push((record.uid.clone(), validate));
        Ok(())
    }

    async fn close(&self) -> Result<(), SealgateError> {
        Ok(())
    }
}
