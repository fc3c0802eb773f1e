//! Process settings loaded via OrthoConfig.
//!
//! Every field can be set from the command line, a `TRIPSHARE_*` environment
//! variable, or a configuration file. Absent optional values fall back to the
//! defaults exposed by the accessor methods.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use tripshare::outbound::identity::DEFAULT_TOKENINFO_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;

/// Invalid or missing settings detected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    #[error("database_url is required (set TRIPSHARE_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("invalid identity token-info URL {value}: {message}")]
    TokenInfoUrl { value: String, message: String },
}

/// Configuration values for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRIPSHARE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Token-info endpoint used to verify bearer tokens.
    pub identity_tokeninfo_url: Option<String>,
    /// OAuth client id tokens must be issued for.
    pub identity_audience: Option<String>,
    /// Timeout for identity provider lookups.
    pub identity_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .max(1)
    }

    pub fn identity_tokeninfo_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .identity_tokeninfo_url
            .as_deref()
            .unwrap_or(DEFAULT_TOKENINFO_URL);
        Url::parse(raw).map_err(|err| SettingsError::TokenInfoUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }
}
