//! Configuración del backend.
//!
//! Se carga una sola vez al arrancar (`.env` opcional + variables con prefijo
//! `PIPELINE`, anidadas con `__`) y después no se modifica:
//!
//! - `PIPELINE__SERVER__PORT=8000`
//! - `PIPELINE__SERVER__CORS_ORIGINS=http://localhost:3000,http://localhost:5173`

use axum::http::HeaderValue;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no se pudo cargar la configuración: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuración inválida: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("puerto inválido")]
    InvalidPort,

    #[error("request_timeout_secs debe estar entre 1 y 300")]
    InvalidTimeout,

    #[error("la lista de orígenes CORS está vacía")]
    NoCorsOrigins,

    #[error("origen CORS inválido: {0}")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PIPELINE").separator("__"))
            .build()?
            .try_deserialize::<Self>()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Filtro de `tracing` si no hay RUST_LOG.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Orígenes permitidos, separados por coma.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Orígenes ya convertidos a header para el `CorsLayer`.
    pub fn cors_header_values(&self) -> Result<Vec<HeaderValue>, ValidationError> {
        let origins = self.cors_origins_list();
        if origins.is_empty() {
            return Err(ValidationError::NoCorsOrigins);
        }

        origins
            .into_iter()
            .map(|origin| {
                let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
                match origin.parse::<HeaderValue>() {
                    Ok(value) if scheme_ok => Ok(value),
                    _ => Err(ValidationError::InvalidCorsOrigin(origin)),
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        self.cors_header_values()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info,backend=debug,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

// puertos de desarrollo del editor (Next.js)
fn default_cors_origins() -> String {
    [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:3001",
    ]
    .join(",")
}
