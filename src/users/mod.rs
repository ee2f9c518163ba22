// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::app_state::AppState;
use crate::config::ValidatedConfig;
use crate::iam::AuthRequest;
use crate::templates::HomePageContext;

/// Configure token-gated user routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/home", web::get().to(home));
}

async fn home(
    req: HttpRequest,
    config: web::Data<ValidatedConfig>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let user = match req.authenticated_user() {
        Some(user) => user,
        None => return Ok(unauthenticated_response()),
    };

    log::info!("Serving home page for user: {}", user.username);
    let context = HomePageContext::new(&config.app.name, &user.username, None);
    let html = app_state
        .templates
        .render("users/home_page.html", context.to_value())
        .map_err(|err| {
            log::error!("Failed to render home page: {}", err);
            actix_web::error::ErrorInternalServerError("Template rendering failed")
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .append_header(("Cache-Control", "no-store"))
        .body(html))
}

/// The single response for every guard failure. Absent, malformed, expired,
/// and tampered tokens all look the same from the outside.
pub(crate) fn unauthenticated_response() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
        .json(serde_json::json!({ "detail": "Could not validate credentials" }))
}
