use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub bookings: BookingConfig,
    pub invoices: InvoiceConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// Empty means a random secret is generated at startup.
    pub jwt_secret: String,
    pub session_lifetime_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_lifetime_seconds: 1800,
        }
    }
}

/// How timestamp-derived identifiers are made.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Prefix + `YYYYMMDDHHMMSS`. Two ids issued within one second are equal.
    #[default]
    Timestamp,
    /// Like `Timestamp`, with `-N` appended to the N-th repeat within a second.
    Sequenced,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    pub id_prefix: String,
    pub id_scheme: IdScheme,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            id_prefix: "BK".to_string(),
            id_scheme: IdScheme::Timestamp,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Builtin,
    Wkhtmltopdf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvoiceConfig {
    pub directory: PathBuf,
    pub handle_prefix: String,
    pub engine: EngineKind,
    pub wkhtmltopdf_path: String,
    pub render_timeout_ms: u64,
    pub currency_symbol: String,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("static/bills"),
            handle_prefix: "bill_".to_string(),
            engine: EngineKind::Builtin,
            wkhtmltopdf_path: "wkhtmltopdf".to_string(),
            render_timeout_ms: 10_000,
            currency_symbol: "Rs.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub redis_url: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            redis_url: "redis://127.0.0.1/".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Built-in defaults, so every file below is optional
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `CINEBOOK__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("CINEBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
