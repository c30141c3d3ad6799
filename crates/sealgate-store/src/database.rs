// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps a single [`tokio_rusqlite::Connection`] and every
//! query module calls through it. Do NOT create additional Connection
//! instances for writes; the single-writer model is what keeps concurrent
//! saves free of SQLITE_BUSY errors.

use std::path::Path;

use tracing::debug;

use sealgate_core::SealgateError;

use crate::migrations;

/// Handle to one open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens the database at `path`, creating the file and any missing parent
    /// directories, then applies PRAGMAs and runs pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, SealgateError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SealgateError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        let pragmas = if wal_mode {
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;"
        } else {
            "PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;"
        };
        conn.call(move |conn| {
            conn.execute_batch(pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let migrated = conn
            .call(|conn| Ok(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)?;
        migrated?;

        debug!(path, wal_mode, "database open and migrated");
        Ok(Database { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL. Idempotent; the connection stays usable.
    pub async fn close(&self) -> Result<(), SealgateError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the storage error domain.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> SealgateError {
    SealgateError::Storage {
        source: Box::new(e),
    }
}
