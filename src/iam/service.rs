// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Core business logic for the authentication system: registration,
//! credential validation, token issuance, and bearer-token resolution.
//! Handlers call into this service; it orchestrates the user store, the
//! password hasher, and the token codec.

use super::jwt::JwtService;
use super::password::{hash_password, verify_password};
use super::types::{AuthError, RegisterError, User};
use super::validation::{validate_password, validate_username};
use crate::db::{StoreError, UserRepository};

/// Methods are synchronous and blocking (argon2 work plus store calls);
/// the request-handling layer runs them under `web::block`.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: UserRepository, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Validate and create a new user identity. The existence lookup is a
    /// best-effort fast path; the store's unique constraint is what actually
    /// guards against concurrent registrations of the same username.
    pub fn register(&self, username: &str, password: &str) -> Result<User, RegisterError> {
        validate_username(username)?;
        validate_password(password)?;

        if self.users.find_by_username(username)?.is_some() {
            return Err(RegisterError::UsernameTaken);
        }

        let password_hash = hash_password(password).map_err(RegisterError::Hash)?;

        match self.users.create(username, &password_hash) {
            Ok(user) => {
                log::info!("User {} registered successfully", user.username);
                Ok(user)
            }
            Err(StoreError::UniqueViolation) => Err(RegisterError::UsernameTaken),
            Err(err) => Err(RegisterError::Store(err)),
        }
    }

    /// Validate credentials and issue a session token. An unknown username
    /// and a wrong password produce the same error.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.users.find_by_username(username).map_err(AuthError::Store)? {
            Some(user) => user,
            None => {
                log::warn!("Login failed for username: {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            log::warn!("Login failed for username: {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.jwt.create_token(&user.username).map_err(AuthError::Token)?;
        log::info!("Login successful for username: {}", user.username);
        Ok(token)
    }

    /// Resolve a bearer token to a user identity. Every failure mode
    /// collapses to `Unauthenticated`; the reason is only logged.
    pub fn authenticate_token(&self, token: &str) -> Result<User, AuthError> {
        let subject = match self.jwt.verify_token(token) {
            Ok(subject) => subject,
            Err(err) => {
                log::debug!("Bearer token rejected: {}", err);
                return Err(AuthError::Unauthenticated);
            }
        };

        match self.users.find_by_username(&subject) {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                log::warn!("Bearer token subject no longer exists: {}", subject);
                Err(AuthError::Unauthenticated)
            }
            Err(err) => {
                log::error!("User lookup failed while resolving bearer token: {}", err);
                Err(AuthError::Unauthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, validate_config};
    use crate::db::test_pool;
    use crate::iam::jwt::TokenError;
    use crate::iam::types::ValidationError;
    use chrono::Duration;

    fn test_service(dir: &std::path::Path) -> AuthService {
        let config: Config = serde_yaml::from_str(
            "auth:\n  secret_key: \"0123456789abcdef0123456789abcdef\"\n  token_ttl_minutes: 30\n",
        )
        .expect("config");
        let config = validate_config(config).expect("validated config");
        let jwt = JwtService::new(&config).expect("jwt service");
        AuthService::new(UserRepository::new(test_pool(dir)), jwt)
    }

    #[test]
    fn register_then_login_succeeds() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());

        let user = service.register("alice01", "Passw0rd!").expect("register");
        assert_eq!(user.username, "alice01");

        let token = service.login("alice01", "Passw0rd!").expect("login");
        let resolved = service.authenticate_token(&token).expect("authenticate");
        assert_eq!(resolved.username, "alice01");
        assert_eq!(resolved.id, user.id);
    }

    #[test]
    fn register_rejects_short_username() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        let err = service.register("ab", "Passw0rd!").expect_err("short name");
        assert!(matches!(
            err,
            RegisterError::Validation(ValidationError::Username(_))
        ));
    }

    #[test]
    fn register_rejects_weak_password() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        let err = service
            .register("alice01", "weakpass")
            .expect_err("weak password");
        assert!(matches!(
            err,
            RegisterError::Validation(ValidationError::Password(_))
        ));
    }

    #[test]
    fn duplicate_registration_reports_username_taken() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        service.register("alice01", "Passw0rd!").expect("register");
        let err = service
            .register("alice01", "Passw0rd!")
            .expect_err("duplicate");
        assert!(matches!(err, RegisterError::UsernameTaken));
    }

    #[test]
    fn wrong_password_and_unknown_user_are_indistinguishable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        service.register("alice01", "Passw0rd!").expect("register");

        let wrong_password = service
            .login("alice01", "Wr0ngpass!")
            .expect_err("wrong password");
        let unknown_user = service
            .login("nosuchuser", "Passw0rd!")
            .expect_err("unknown user");

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        service.register("alice01", "Passw0rd!").expect("register");

        let token = service
            .jwt()
            .create_token_with_ttl("alice01", Duration::minutes(-5))
            .expect("token");
        let err = service.authenticate_token(&token).expect_err("expired");
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn token_for_missing_user_is_unauthenticated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());

        let token = service.jwt().create_token("ghost").expect("token");
        let err = service.authenticate_token(&token).expect_err("no user");
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn garbage_token_is_unauthenticated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        let err = service
            .authenticate_token("not-a-token")
            .expect_err("garbage");
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn token_round_trip_is_exercised_by_jwt_service() {
        let temp = tempfile::tempdir().expect("tempdir");
        let service = test_service(temp.path());
        let token = service.jwt().create_token("alice01").expect("token");
        assert!(matches!(
            service.jwt().verify_token("x.y.z"),
            Err(TokenError::Malformed)
        ));
        assert_eq!(service.jwt().verify_token(&token).expect("subject"), "alice01");
    }
}
