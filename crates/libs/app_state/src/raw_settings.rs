use serde::Deserialize;
use std::path::PathBuf;

/// Settings exactly as they appear in `config/settings.yaml` (plus `APP__` env overrides).
#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: RawApiSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
    pub database: DatabaseSettings,
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawApiSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub public_url: String,
    #[serde(default)]
    pub tls: Option<TlsSettings>,
}

/// PEM files used to serve over HTTPS. Plain HTTP is used when absent.
#[derive(Debug, Deserialize, Clone)]
pub struct TlsSettings {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub jwt: String,
    pub database_url: String,
}

/// Database connection pool configuration. Durations are in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: u64,
    pub idle_timeout: u64,
    pub acquire_timeout: u64,
    #[serde(default)]
    pub run_migrations: bool,
}

/// Map view policy shared between the server and its clients.
#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    /// Above this many points the client switches from markers to a WebGL cluster layer.
    pub cluster_threshold: usize,
    /// Quiet period after the last viewport change before a request is sent.
    pub debounce_ms: u64,
    pub default_page_size: i64,
    pub max_page_size: i64,
    /// Clicking a marker below this zoom level flies the camera to it.
    pub marker_fly_to_zoom: f64,
}
