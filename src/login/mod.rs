// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::iam::{AuthError, AuthService, RegisterError};
use crate::templates::{AuthPageContext, HomePageContext};

const LOGIN_TEMPLATE: &str = "login/login_page.html";
const REGISTER_TEMPLATE: &str = "login/register_page.html";
const HOME_TEMPLATE: &str = "users/home_page.html";

/// Configure login and registration routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(login_page))
        .route("/register", web::get().to(register_page))
        .route("/register", web::post().to(register_submit))
        .route("/login", web::post().to(login_submit));
}

#[derive(Debug, Deserialize)]
struct AuthForm {
    username: String,
    password: String,
}

async fn login_page(
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    log::info!("Serving login page");
    let context = AuthPageContext::new(&config.app.name);
    render_html(&app_state, LOGIN_TEMPLATE, context.to_value())
}

async fn register_page(
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    log::info!("Serving register page");
    let context = AuthPageContext::new(&config.app.name);
    render_html(&app_state, REGISTER_TEMPLATE, context.to_value())
}

async fn register_submit(
    form: web::Form<AuthForm>,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse> {
    let AuthForm { username, password } = form.into_inner();
    log::info!("Register attempt for username: {}", username);

    let service = auth.get_ref().clone();
    let register_username = username.clone();
    let result = web::block(move || service.register(&register_username, &password))
        .await
        .map_err(|err| {
            log::error!("Registration task failed: {}", err);
            actix_web::error::ErrorInternalServerError("Registration failed")
        })?;

    let app_name = &config.app.name;
    match result {
        Ok(_user) => {
            let context = AuthPageContext::with_message(
                app_name,
                "Registration successful, please login".to_string(),
            );
            render_html(&app_state, LOGIN_TEMPLATE, context.to_value())
        }
        Err(RegisterError::Validation(err)) => {
            log::warn!("Registration failed: {}", err);
            let context = AuthPageContext::with_error(app_name, err.to_string());
            render_html(&app_state, REGISTER_TEMPLATE, context.to_value())
        }
        Err(RegisterError::UsernameTaken) => {
            log::warn!("Registration failed: Username {} already exists", username);
            let context =
                AuthPageContext::with_error(app_name, "Username already exists".to_string());
            render_html(&app_state, REGISTER_TEMPLATE, context.to_value())
        }
        Err(err) => {
            log::error!("Registration failed: {}", err);
            let context = AuthPageContext::with_error(
                app_name,
                "Registration failed. Please try again.".to_string(),
            );
            render_html(&app_state, REGISTER_TEMPLATE, context.to_value())
        }
    }
}

async fn login_submit(
    form: web::Form<AuthForm>,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse> {
    let AuthForm { username, password } = form.into_inner();
    log::info!("Login attempt for username: {}", username);

    let service = auth.get_ref().clone();
    let login_username = username.clone();
    let result = web::block(move || service.login(&login_username, &password))
        .await
        .map_err(|err| {
            log::error!("Login task failed: {}", err);
            actix_web::error::ErrorInternalServerError("Login failed")
        })?;

    let app_name = &config.app.name;
    match result {
        Ok(token) => {
            let context = HomePageContext::new(app_name, &username, Some(token));
            render_html(&app_state, HOME_TEMPLATE, context.to_value())
        }
        Err(AuthError::InvalidCredentials) => {
            let context = AuthPageContext::with_error(
                app_name,
                "Invalid username or password".to_string(),
            );
            render_html(&app_state, LOGIN_TEMPLATE, context.to_value())
        }
        Err(err) => {
            // Internal failure; the response stays indistinguishable from a
            // credential mismatch.
            log::error!("Login failed: {}", err);
            let context = AuthPageContext::with_error(
                app_name,
                "Invalid username or password".to_string(),
            );
            render_html(&app_state, LOGIN_TEMPLATE, context.to_value())
        }
    }
}

fn render_html(
    app_state: &AppState,
    template_name: &str,
    context: minijinja::Value,
) -> Result<HttpResponse> {
    let html = app_state
        .templates
        .render(template_name, context)
        .map_err(|err| {
            log::error!("Failed to render template {}: {}", template_name, err);
            actix_web::error::ErrorInternalServerError("Template rendering failed")
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .append_header(("Cache-Control", "no-store"))
        .body(html))
}
