// SPDX-FileCopyrightText: 2026 Sealgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity record queries.

use rusqlite::params;

use sealgate_core::{IdentityField, IdentityRecord, SealgateError};

use crate::database::Database;

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<IdentityRecord, rusqlite::Error> {
    Ok(IdentityRecord {
        uid: row.get(0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        webseal_attributes: Default::default(),
    })
}

/// Look up a single record where `field` equals `value`.
pub async fn find_one_by(
    db: &Database,
    field: IdentityField,
    value: &str,
) -> Result<Option<IdentityRecord>, SealgateError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            let sql = match field {
                IdentityField::Uid => {
                    "SELECT uid, username, created_at, updated_at
                     FROM identities WHERE uid = ?1 LIMIT 1"
                }
                IdentityField::Username => {
                    "SELECT uid, username, created_at, updated_at
                     FROM identities WHERE username = ?1
                     ORDER BY created_at LIMIT 1"
                }
            };
            let mut stmt = conn.prepare(sql)?;
            let result = stmt.query_row(params![value], record_from_row);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert the record, or update the row with the same uid.
///
/// `created_at` is kept from the existing row on conflict; `updated_at` is
/// always rewritten by the database clock. The whole statement is one SQLite
/// upsert, so concurrent saves of the same uid converge on a single row.
pub async fn upsert(db: &Database, record: &IdentityRecord) -> Result<(), SealgateError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO identities (uid, username, created_at, updated_at)
                 VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(uid) DO UPDATE SET
                     username = excluded.username,
                     updated_at = excluded.updated_at",
                params![record.uid, record.username, record.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
