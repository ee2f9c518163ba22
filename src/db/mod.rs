// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

mod users;

pub use users::UserRepository;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

#[derive(Debug)]
pub enum StoreError {
    UniqueViolation,
    Pool(String),
    Database(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::UniqueViolation => write!(f, "Unique constraint violation"),
            StoreError::Pool(msg) => write!(f, "Connection pool error: {}", msg),
            StoreError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub(crate) fn map_sqlite_error(err: rusqlite::Error) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::UniqueViolation
        }
        _ => StoreError::Database(err.to_string()),
    }
}

/// Open a connection pool against the configured database file. WAL mode
/// lets reads proceed while a write holds the page lock; the busy timeout
/// keeps concurrent writers queueing instead of failing.
pub fn init_pool(path: &Path) -> Result<DbPool, StoreError> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
    });
    r2d2::Pool::builder()
        .build(manager)
        .map_err(|err| StoreError::Pool(err.to_string()))
}

/// Create the schema if it does not exist. Username uniqueness lives here,
/// as a constraint, so concurrent registrations of the same name race on
/// the database and exactly one wins.
pub fn init_schema(pool: &DbPool) -> Result<(), StoreError> {
    let conn = pool.get().map_err(|err| StoreError::Pool(err.to_string()))?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL,
            updated_at    TEXT
        );",
    )
    .map_err(map_sqlite_error)
}

#[cfg(test)]
pub(crate) fn test_pool(dir: &Path) -> DbPool {
    let pool = init_pool(&dir.join("test.db")).expect("pool");
    init_schema(&pool).expect("schema");
    pool
}
