//! Command line and environment configuration for the server.

use clap::Parser;
use time::Duration;

use crate::app_state::{DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SESSION_DURATION, SessionSettings};

/// The environment name that marks session cookies as secure.
const PRODUCTION_ENV: &str = "PROD";

/// The REST API server for tracking personal finances.
///
/// Every option can also be set with the environment variable named in its
/// help text.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DATABASE_PATH")]
    pub db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// The secret that the session cookie key is derived from.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,

    /// How many hours a session lasts. Non-positive values use the default.
    #[arg(long, env = "SESSION_TTL_HOURS", default_value_t = DEFAULT_SESSION_DURATION.whole_hours())]
    pub session_ttl_hours: i64,

    /// The name of the cookie that holds the session token.
    #[arg(long, env = "SESSION_COOKIE_NAME", default_value = DEFAULT_SESSION_COOKIE_NAME)]
    pub session_cookie_name: String,

    /// The origins allowed to call the API, as a JSON array or a comma
    /// separated list. "*" allows any origin.
    #[arg(long, env = "CORS_ORIGINS", default_value = "[\"*\"]")]
    pub cors_origins: String,

    /// The deployment environment, e.g. DEV or PROD.
    #[arg(long, env = "ENV", default_value = "DEV")]
    pub env: String,
}

impl Config {
    /// Whether the server runs in production.
    pub fn is_production(&self) -> bool {
        self.env.trim().to_uppercase() == PRODUCTION_ENV
    }

    /// The session settings described by this config.
    pub fn session_settings(&self) -> SessionSettings {
        let duration = if self.session_ttl_hours > 0 {
            Duration::hours(self.session_ttl_hours)
        } else {
            DEFAULT_SESSION_DURATION
        };

        let cookie_name = match self.session_cookie_name.trim() {
            "" => DEFAULT_SESSION_COOKIE_NAME.to_owned(),
            name => name.to_owned(),
        };

        SessionSettings {
            cookie_name,
            duration,
            secure_cookie: self.is_production(),
        }
    }

    /// The allowed CORS origins.
    ///
    /// Tries to parse a JSON array of strings, then a comma separated list,
    /// and falls back to allowing any origin.
    pub fn cors_origins(&self) -> Vec<String> {
        parse_origins(&self.cors_origins)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    let raw = raw.trim();

    let origins = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(origins) => origins,
        Err(_) => raw.split(',').map(str::to_owned).collect(),
    };

    let origins: Vec<String> = origins
        .into_iter()
        .map(|origin| origin.trim().to_owned())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.is_empty() {
        vec!["*".to_owned()]
    } else {
        origins
    }
}
