// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{HttpMessage, HttpRequest, web};
use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc; // Services are per-thread

use super::service::AuthService;
use super::types::User;

/// Trait to add authentication methods to HttpRequest
pub trait AuthRequest {
    fn authenticated_user(&self) -> Option<User>;
    fn is_authenticated(&self) -> bool;
}

impl AuthRequest for HttpRequest {
    fn authenticated_user(&self) -> Option<User> {
        self.extensions().get::<User>().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.extensions().get::<User>().is_some()
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header_value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

// Bearer-token guard. Resolves `Authorization: Bearer <token>` to a stored
// user and attaches it to the request; on any failure the request simply
// proceeds without an identity and protected handlers reject it.
pub struct BearerAuthMiddlewareFactory;

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_data = req.app_data::<Data<AuthService>>().cloned();
        let token = bearer_token(&req);
        let service = self.service.clone();

        Box::pin(async move {
            if let (Some(auth), Some(token)) = (auth_data, token) {
                let auth_service = auth.get_ref().clone();
                match web::block(move || auth_service.authenticate_token(&token)).await {
                    Ok(Ok(user)) => {
                        req.extensions_mut().insert(user);
                    }
                    Ok(Err(_)) => {
                        // Rejection reason already logged by the service;
                        // nothing is attached and the guard stays silent.
                    }
                    Err(err) => {
                        log::error!("Bearer token resolution task failed: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}
