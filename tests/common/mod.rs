// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::test::TestRequest;
use actix_web::{App, Error, test, web};
use gatelock::app_state::AppState;
use gatelock::builtin;
use gatelock::config::{
    AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
    ValidatedConfig,
};
use gatelock::db::{self, UserRepository};
use gatelock::headers::SecurityHeaders;
use gatelock::iam::{AuthService, BearerAuthMiddlewareFactory, JwtService, User};
use gatelock::login;
use gatelock::users;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_USERNAME: &str = "testuser";
pub const TEST_PASSWORD: &str = "Testpass123!";

pub struct TestHarness {
    pub fixture: TempDir,
    pub config: Arc<ValidatedConfig>,
    pub app_state: Arc<AppState>,
    pub repository: UserRepository,
    pub auth_service: AuthService,
}

impl TestHarness {
    pub fn new() -> Self {
        let fixture = tempfile::tempdir().expect("fixture root");
        let db_path = fixture.path().join("gatelock-test.db");

        let config = Arc::new(build_config(db_path.to_str().expect("utf-8 db path")));
        let pool = db::init_pool(&db_path).expect("pool");
        db::init_schema(&pool).expect("schema");

        let repository = UserRepository::new(pool);
        let jwt_service = JwtService::new(&config).expect("jwt service");
        let auth_service = AuthService::new(repository.clone(), jwt_service);

        Self {
            fixture,
            config,
            app_state: Arc::new(AppState::new()),
            repository,
            auth_service,
        }
    }

    pub fn register_user(&self, username: &str, password: &str) -> User {
        self.auth_service
            .register(username, password)
            .expect("register user")
    }

    pub fn token_for(&self, username: &str) -> String {
        self.auth_service
            .jwt()
            .create_token(username)
            .expect("token")
    }

    pub fn expired_token_for(&self, username: &str) -> String {
        self.auth_service
            .jwt()
            .create_token_with_ttl(username, chrono::Duration::minutes(-5))
            .expect("expired token")
    }
}

fn build_config(db_path: &str) -> ValidatedConfig {
    ValidatedConfig {
        app: AppConfig {
            name: "Test App".to_string(),
            environment: "development".to_string(),
        },
        server: ServerConfig::default(),
        database: DatabaseConfig {
            path: db_path.to_string(),
        },
        auth: AuthConfig {
            secret_key: TEST_SECRET.to_string(),
            algorithm: "HS256".to_string(),
            token_ttl_minutes: 30,
        },
        logging: LoggingConfig::default(),
        security: SecurityConfig::default(),
    }
}

pub fn build_test_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(harness.config.clone()))
        .app_data(web::Data::from(harness.app_state.clone()))
        .app_data(web::Data::new(harness.auth_service.clone()))
        .wrap(SecurityHeaders)
        .wrap(BearerAuthMiddlewareFactory)
        .service(web::scope("/auth").configure(login::configure))
        .service(web::scope("/users").configure(users::configure))
        .configure(builtin::configure)
}

pub fn form_request(uri: &str, username: &str, password: &str) -> TestRequest {
    TestRequest::post().uri(uri).set_form(serde_json::json!({
        "username": username,
        "password": password,
    }))
}

pub fn bearer_request(uri: &str, token: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

pub async fn body_string<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let body = test::read_body(resp).await;
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

/// Pull the session token out of the rendered home page.
pub fn extract_token(html: &str) -> Option<String> {
    let marker = "name=\"token\" value=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}
