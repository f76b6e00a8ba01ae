#[macro_use]
extern crate tracing;
extern crate serde_json;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::web::Data;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use vaultly_lib::auth::session::SessionAuth;
use vaultly_lib::auth::CookieSettings;
use vaultly_lib::config::Config;
use vaultly_lib::{auth, category, report, telemetry, time, transaction, user};
use vaultly_repo::HealthCheck;

const SERVICE_NAME: &str = "vaultly-server";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config_path = get_config_file()?;
    let config: Config = Config::from_file(config_path)?;

    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    match &config.telemetry {
        Some(telemetry_config) => {
            let telemetry_layer =
                telemetry::create_opentelemetry_layer(SERVICE_NAME, telemetry_config)?;
            tracing::subscriber::set_global_default(subscriber.with(telemetry_layer))
                .expect("set up subscriber");
        }
        None => {
            tracing::subscriber::set_global_default(subscriber).expect("set up subscriber");
        }
    }
    drop(tracing_guard);

    let repos = vaultly_repo::sqlx_repo::create_repos(&config.database_url, 10).await?;
    let session_auth = SessionAuth::new(repos.sessions.clone());
    let cookie_settings = CookieSettings {
        secure: config.secure_cookies,
    };

    let signups_enabled = config.signups_enabled;
    let frontend_origin = config.frontend_origin.clone();

    let mut server = HttpServer::new(move || {
        let cors = match &frontend_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials(),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(Data::new(repos.transactions.clone()))
            .app_data(Data::new(repos.categories.clone()))
            .app_data(Data::new(repos.users.clone()))
            .app_data(Data::new(repos.health.clone()))
            .app_data(Data::new(session_auth.clone()))
            .app_data(Data::new(cookie_settings))
            .wrap(cors)
            .wrap(telemetry::create_middleware())
            .service(
                web::scope("/api")
                    .service(time::time_service())
                    .service(auth::auth_service(signups_enabled))
                    .service(
                        transaction::transaction_service().wrap(auth::SessionAuthentication),
                    )
                    .service(category::category_service().wrap(auth::SessionAuthentication))
                    .service(report::report_service().wrap(auth::SessionAuthentication))
                    .service(user::user_service().wrap(auth::SessionAuthentication))
                    .route("/health", web::get().to(health)),
            )
            .app_data(web::JsonConfig::default().error_handler(|err, req| {
                error!(req_path = req.path(), %err);
                match err {
                    JsonPayloadError::Deserialize(deserialize_err) => {
                        let error_body = serde_json::json!({
                            "error": "Unable to parse JSON payload",
                            "detail": format!("{}", deserialize_err),
                        });
                        actix_web::error::InternalError::from_response(
                            deserialize_err,
                            HttpResponse::BadRequest()
                                .content_type("application/json")
                                .body(error_body.to_string()),
                        )
                        .into()
                    }
                    _ => err.into(),
                }
            }))
    });
    server = match config.ssl {
        None => {
            warn!("Using http");
            server.bind("0.0.0.0:8000")?
        }
        Some(ssl_config) => {
            info!("Using https");

            let tls_config = ServerConfig::builder()
                .with_safe_defaults()
                .with_no_client_auth();

            let mut cert_file = BufReader::new(
                File::open(ssl_config.certificate_chain_file)
                    .context("Error opening certificate chain file")?,
            );
            let mut key_file = BufReader::new(
                File::open(ssl_config.private_key_file)
                    .context("Error opening private key file")?,
            );

            let cert_chain = certs(&mut cert_file)
                .context("Unable to read certificate chain file")?
                .into_iter()
                .map(Certificate)
                .collect();
            let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
                .context("Unable to read private key file")?
                .into_iter()
                .map(PrivateKey)
                .collect();

            if keys.is_empty() {
                error!("No private key found in file");
                std::process::exit(1);
            }

            let tls_config = tls_config.with_single_cert(cert_chain, keys.remove(0))?;

            server.bind_rustls("0.0.0.0:8000", tls_config)?
        }
    };
    server.run().await?;

    Ok(())
}

async fn health(health_check: Data<Arc<dyn HealthCheck>>) -> HttpResponse {
    if health_check.check().await {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::ServiceUnavailable().finish()
    }
}

fn get_config_file() -> Result<PathBuf, &'static str> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Ok(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    Err("Config file not found")
}
