// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::db::StoreError;
use crate::iam::jwt::TokenError;
use crate::iam::password::PasswordError;
use chrono::{DateTime, Utc};

/// A stored user identity. The password hash stays inside the crate; the
/// request-handling layer only ever sees the username.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub(crate) password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub enum ValidationError {
    Username(String),
    Password(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Username(msg) => write!(f, "{}", msg),
            ValidationError::Password(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum RegisterError {
    Validation(ValidationError),
    UsernameTaken,
    Hash(PasswordError),
    Store(StoreError),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::Validation(err) => write!(f, "{}", err),
            RegisterError::UsernameTaken => write!(f, "Username already exists"),
            RegisterError::Hash(err) => write!(f, "Password hashing error: {}", err),
            RegisterError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for RegisterError {}

impl From<ValidationError> for RegisterError {
    fn from(err: ValidationError) -> Self {
        RegisterError::Validation(err)
    }
}

impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        RegisterError::Store(err)
    }
}

/// Externally visible authentication failures. `InvalidCredentials` and
/// `Unauthenticated` are deliberately generic; the store and token variants
/// exist for logging at the boundary and are never shown to clients.
#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    Unauthenticated,
    Store(StoreError),
    Token(TokenError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::Unauthenticated => write!(f, "Could not validate credentials"),
            AuthError::Store(err) => write!(f, "Store error: {}", err),
            AuthError::Token(err) => write!(f, "Token error: {}", err),
        }
    }
}

impl std::error::Error for AuthError {}
