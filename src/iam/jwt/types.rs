// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(default)]
    pub sub: String, // Subject (username)
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration
}

#[derive(Debug, Clone)]
pub enum TokenError {
    Malformed,
    BadSignature,
    Expired,
    MissingSubject,
    CreationError(String),
    ConfigurationError(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Token is malformed"),
            TokenError::BadSignature => write!(f, "Token signature does not match"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::MissingSubject => write!(f, "Token carries no subject"),
            TokenError::CreationError(msg) => write!(f, "Token creation error: {}", msg),
            TokenError::ConfigurationError(msg) => write!(f, "Token configuration error: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claims_default_subject_to_empty() {
        let claims: Claims = serde_json::from_value(json!({
            "iat": 1700000000,
            "exp": 1700001800
        }))
        .expect("claims should deserialize");

        assert!(claims.sub.is_empty());
    }
}
