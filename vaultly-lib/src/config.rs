use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs};

#[derive(Deserialize, Clone)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct TelemetryConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub signups_enabled: bool,
    /// Origin of the web client, used for CORS. Unset allows any origin
    /// (development).
    pub frontend_origin: Option<String>,
    /// Cross-origin HTTPS deployments need `SameSite=None; Secure` session
    /// cookies; local development over plain http needs `SameSite=Lax`.
    #[serde(default)]
    pub secure_cookies: bool,
    pub telemetry: Option<TelemetryConfig>,
    pub ssl: Option<SSLConfig>,
}

impl Config {
    pub fn from_file(path: PathBuf) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path).context("Unable to read config file")?;
        let config: Config =
            toml::from_str(config.as_str()).with_context(|| "Unable to parse config")?;
        Ok(config)
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let signups_enabled = read_env("SIGNUPS_ENABLED")?;
        let signups_enabled = signups_enabled
            .parse()
            .context("Unable to parse SIGNUPS_ENABLED value")?;
        let database_url = read_env("DATABASE_URL")?;
        let frontend_origin = env::var("FRONTEND_ORIGIN").ok();
        let secure_cookies = match env::var("SECURE_COOKIES") {
            Ok(value) => value
                .parse()
                .context("Unable to parse SECURE_COOKIES value")?,
            Err(_) => false,
        };
        let telemetry = env::var("OTLP_ENDPOINT").ok().map(|endpoint| TelemetryConfig {
            endpoint,
            api_key: env::var("OTLP_API_KEY").ok(),
        });

        let config = Config {
            database_url,
            signups_enabled,
            frontend_origin,
            secure_cookies,
            telemetry,
            ssl: None,
        };
        Ok(config)
    }
}

fn read_env(key: &str) -> Result<String, anyhow::Error> {
    env::var(key).with_context(|| format!("Unable to read env var: {}", key))
}
