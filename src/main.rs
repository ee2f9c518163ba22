// This file is part of the product Gatelock.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{LevelFilter, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod app_state;
mod builtin;
mod config;
mod db;
mod headers;
mod iam;
mod login;
mod templates;
mod users;

use actix_cors::Cors;
use app_state::AppState;
use config::ValidatedConfig;
use db::UserRepository;
use headers::SecurityHeaders;
use iam::{AuthService, BearerAuthMiddlewareFactory, JwtService};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <path> to point at the configuration file.");
            return 1;
        }
    };

    if parsed_args.show_help {
        print!("{}", help_text());
        return 0;
    }

    // Fail fast before binding anything: an invalid configuration (most
    // importantly a missing signing secret) must never accept requests.
    let validated_config = match config::load_and_validate(&parsed_args.config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("❌ Configuration error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    let result = System::new().block_on(run_server(validated_config));
    match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(validated_config: ValidatedConfig) -> std::io::Result<()> {
    init_logger(&validated_config)?;
    log_startup_info(&validated_config);

    let jwt_service = JwtService::new(&validated_config).map_err(|error| {
        eprintln!("❌ Failed to initialize token service: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    let pool = db::init_pool(Path::new(&validated_config.database.path)).map_err(|error| {
        eprintln!("❌ Failed to open database: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    db::init_schema(&pool).map_err(|error| {
        eprintln!("❌ Failed to initialize database schema: {}", error);
        std::io::Error::other(error.to_string())
    })?;
    info!("✅ Database initialized successfully");

    let auth_service = AuthService::new(UserRepository::new(pool), jwt_service);
    info!("✅ Auth service initialized successfully");

    let app_state = Arc::new(AppState::new());
    let config = Arc::new(validated_config);
    let workers = config.server.workers;
    let bind_address = (config.server.host.clone(), config.server.port);

    let factory = {
        let config = config.clone();
        let app_state = app_state.clone();
        let auth_service = auth_service.clone();

        move || {
            let cors = build_cors(&config);
            App::new()
                .app_data(web::Data::from(config.clone()))
                .app_data(web::Data::from(app_state.clone()))
                .app_data(web::Data::new(auth_service.clone()))
                .wrap(Logger::new(
                    r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
                ))
                .wrap(SecurityHeaders)
                .wrap(cors)
                .wrap(BearerAuthMiddlewareFactory)
                .service(web::scope("/auth").configure(login::configure))
                .service(web::scope("/users").configure(users::configure))
                .configure(builtin::configure)
        }
    };

    HttpServer::new(factory)
        .workers(workers)
        .bind(bind_address)?
        .run()
        .await
}

fn build_cors(config: &ValidatedConfig) -> Cors {
    if config.is_development() {
        Cors::permissive()
    } else if let Some(origin) = config.security.cors_allowed_origin.as_deref() {
        Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allow_any_header()
            .supports_credentials()
            .max_age(3600)
    } else {
        Cors::default()
    }
}

fn init_logger(config: &ValidatedConfig) -> std::io::Result<()> {
    let log_level = match config.logging.level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    // Stable timestamped format regardless of RUST_LOG overrides
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(|error| std::io::Error::other(error.to_string()))
}

fn log_startup_info(config: &ValidatedConfig) {
    info!(
        "Starting {} ({} environment)",
        config.app.name, config.app.environment
    );
    info!(
        "Listening on http://{}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    info!("Database file: {}", config.database.path);
    info!(
        "Session token TTL: {} minutes",
        config.auth.token_ttl_minutes
    );
}

struct ParsedArgs {
    config_path: PathBuf,
    show_help: bool,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config_path = PathBuf::from("config.yaml");
    let mut show_help = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "-h" || arg == "--help" {
            show_help = true;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            config_path = PathBuf::from(value);
        } else {
            return Err(format!("Unknown argument: {}", arg));
        }
    }

    Ok(ParsedArgs {
        config_path,
        show_help,
    })
}

fn help_text() -> String {
    [
        "gatelock - username/password authentication service",
        "",
        "Usage: gatelock [-C <config.yaml>]",
        "",
        "  -C <path>   Path to the configuration file (default: config.yaml)",
        "  -h, --help  Show this help text",
        "",
    ]
    .join("\n")
}
