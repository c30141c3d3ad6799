// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the IdentityStore trait.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use sealgate_config::model::StorageSection;
use sealgate_core::{
    AdapterType, HealthStatus, IdentityField, IdentityRecord, IdentityStore, PluginAdapter,
    SealgateError,
};

use crate::database::Database;
use crate::queries;

/// Shape problems caught by `save(record, validate: true)`.
#[derive(Debug, Error)]
enum RecordError {
    #[error("identity uid must not be empty")]
    EmptyUid,
    #[error("identity username must not be empty when present")]
    EmptyUsername,
}

/// SQLite-backed identity store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call to
/// [`IdentityStore::initialize`].
pub struct SqliteIdentityStore {
    config: StorageSection,
    db: OnceCell<Database>,
}

impl SqliteIdentityStore {
    /// Create a store with the given configuration.
    ///
    /// The database file is not touched until [`IdentityStore::initialize`]
    /// is called.
    pub fn new(config: StorageSection) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, SealgateError> {
        self.db.get().ok_or_else(|| SealgateError::Storage {
            source: "store not initialized, call initialize() first".into(),
        })
    }

    fn validate_record(record: &IdentityRecord) -> Result<(), SealgateError> {
        if record.uid.trim().is_empty() {
            return Err(SealgateError::Storage {
                source: Box::new(RecordError::EmptyUid),
            });
        }
        if matches!(record.username.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(SealgateError::Storage {
                source: Box::new(RecordError::EmptyUsername),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteIdentityStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, SealgateError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SealgateError> {
        // Shutdown delegates to close if the DB was opened.
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for SqliteIdentityStore {
    async fn initialize(&self) -> Result<(), SealgateError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SealgateError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite identity store initialized");
        Ok(())
    }

    async fn find_one_by(
        &self,
        field: IdentityField,
        value: &str,
    ) -> Result<Option<IdentityRecord>, SealgateError> {
        queries::identities::find_one_by(self.db()?, field, value).await
    }

    async fn save(&self, record: &IdentityRecord, validate: bool) -> Result<(), SealgateError> {
        if validate {
            Self::validate_record(record)?;
        }
        queries::identities::upsert(self.db()?, record).await
    }

    async fn close(&self) -> Result<(), SealgateError> {
        self.db()?.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageSection {
        StorageSection {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn store_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::Store);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        let result = store.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));

        let result = store.health_check().await;
        assert!(result.is_err(), "health_check should fail before initialize");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        let status = store.health_check().await.unwrap();
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_identity_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let record = IdentityRecord::build_for(
            IdentityField::Username,
            "alice@sso.example.com",
            "alice",
        );
        store.save(&record, false).await.unwrap();

        let by_uid = store
            .find_one_by(IdentityField::Uid, "alice@sso.example.com")
            .await
            .unwrap();
        assert!(by_uid.is_some());
        assert_eq!(by_uid.unwrap().username, Some("alice".to_string()));

        let by_username = store
            .find_one_by(IdentityField::Username, "alice")
            .await
            .unwrap();
        assert_eq!(
            by_username.map(|r| r.uid),
            Some("alice@sso.example.com".to_string())
        );

        store.close().await.unwrap();
        store.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn validated_save_rejects_empty_uid() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("validate.db");
        let store = SqliteIdentityStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let record = IdentityRecord::build("");
        let err = store.save(&record, true).await.unwrap_err();
        assert!(err.to_string().contains("uid"));

        // The same record passes when validation is skipped.
        store.save(&record, false).await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_saves_of_the_same_uid_converge() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("concurrent.db");
        let store = std::sync::Arc::new(SqliteIdentityStore::new(make_config(
            db_path.to_str().unwrap(),
        )));
        store.initialize().await.unwrap();

        let record = IdentityRecord::build("grace@sso.example.com");
        let a = {
            let store = std::sync::Arc::clone(&store);
            let record = record.clone();
            tokio::spawn(async move { store.save(&record, false).await })
        };
        let b = {
            let store = std::sync::Arc::clone(&store);
            let record = record.clone();
            tokio::spawn(async move { store.save(&record, false).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let found = store
            .find_one_by(IdentityField::Uid, "grace@sso.example.com")
            .await
            .unwrap();
        assert!(found.is_some(), "both saves should land on one row");
    }
}
