// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use minijinja::{Environment, Value, context, default_auto_escape_callback};

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template_loader);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Template loader for minijinja that loads from embedded sources
fn embedded_template_loader(name: &str) -> Result<Option<String>, minijinja::Error> {
    let template_content = match name {
        "login/login_page.html" => Some(include_str!("login/templates/login_page.html")),
        "login/register_page.html" => Some(include_str!("login/templates/register_page.html")),
        "users/home_page.html" => Some(include_str!("users/templates/home_page.html")),
        _ => None,
    };

    Ok(template_content.map(|s| s.to_string()))
}

/// Context for the login and registration pages
#[derive(Debug, Clone)]
pub struct AuthPageContext {
    pub app_name: String,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl AuthPageContext {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            error: None,
            message: None,
        }
    }

    pub fn with_error(app_name: &str, error: String) -> Self {
        Self {
            app_name: app_name.to_string(),
            error: Some(error),
            message: None,
        }
    }

    pub fn with_message(app_name: &str, message: String) -> Self {
        Self {
            app_name: app_name.to_string(),
            error: None,
            message: Some(message),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            error => &self.error,
            message => &self.message
        }
    }
}

/// Context for the home page; the token is present only right after login
#[derive(Debug, Clone)]
pub struct HomePageContext {
    pub app_name: String,
    pub username: String,
    pub token: Option<String>,
}

impl HomePageContext {
    pub fn new(app_name: &str, username: &str, token: Option<String>) -> Self {
        Self {
            app_name: app_name.to_string(),
            username: username.to_string(),
            token,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            app_name => &self.app_name,
            username => &self.username,
            token => &self.token
        }
    }
}
