// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{DbPool, StoreError, map_sqlite_error};
use crate::iam::User;
use chrono::{DateTime, Utc};
use rusqlite::{Row, params};

/// Repository over the users table. Connection acquisition and release are
/// scoped to each call; callers never see a connection.
#[derive(Clone)]
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Case-sensitive exact lookup by username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        log::debug!("Fetching user: {}", username);
        let conn = self.pool.get().map_err(|err| StoreError::Pool(err.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT id, username, password_hash, created_at, updated_at
                 FROM users WHERE username = ?1",
            )
            .map_err(map_sqlite_error)?;

        match stmt.query_row(params![username], map_user_row) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(map_sqlite_error(err)),
        }
    }

    /// Insert a new user row. A username collision surfaces as
    /// `StoreError::UniqueViolation` from the table's constraint; there is
    /// no pre-check here, so concurrent creates cannot both succeed.
    pub fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let conn = self.pool.get().map_err(|err| StoreError::Pool(err.to_string()))?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, created_at.to_rfc3339()],
        )
        .map_err(map_sqlite_error)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
            updated_at: None,
        })
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    let updated_at: Option<String> = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
        updated_at: match updated_at {
            Some(value) => Some(parse_timestamp(4, &value)?),
            None => None,
        },
    })
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}
