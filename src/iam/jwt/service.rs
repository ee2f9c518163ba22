// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::types::{Claims, TokenError};
use crate::config::ValidatedConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Issues and verifies the stateless session tokens. Signing is symmetric
/// (HS256) since the issuer and the verifier are the same process; the
/// secret and the default TTL are fixed at startup.
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    token_ttl: Duration,
}

impl JwtService {
    pub fn new(config: &ValidatedConfig) -> Result<Self, TokenError> {
        if config.auth.secret_key.is_empty() {
            return Err(TokenError::ConfigurationError(
                "Signing secret is empty".to_string(),
            ));
        }
        Ok(JwtService {
            secret: config.auth.secret_key.clone(),
            token_ttl: Duration::minutes(config.auth.token_ttl_minutes as i64),
        })
    }

    /// Create a signed token for a subject with the configured TTL
    pub fn create_token(&self, subject: &str) -> Result<String, TokenError> {
        self.create_token_with_ttl(subject, self.token_ttl)
    }

    /// Create a signed token for a subject with an explicit TTL
    pub fn create_token_with_ttl(
        &self,
        subject: &str,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|err| TokenError::CreationError(err.to_string()))
    }

    /// Verify a token and return its subject exactly as encoded
    pub fn verify_token(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map_err(classify_verify_error)?;

        if token_data.claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Ok(token_data.claims.sub)
    }
}

fn classify_verify_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    }
}
