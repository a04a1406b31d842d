use crate::{
    DatabaseSettings, LoggingSettings, MapSettings, RawApiSettings, RawSettings, SecretSettings,
    TlsSettings,
};
use color_eyre::eyre::{Report, bail};
use std::path::absolute;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub secrets: SecretSettings,
    pub database: DatabaseSettings,
    pub map: MapSettings,
}

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub public_url: String,
    pub tls: Option<TlsSettings>,
}

impl TryFrom<RawApiSettings> for ApiSettings {
    type Error = Report;

    fn try_from(raw: RawApiSettings) -> Result<Self, Self::Error> {
        let tls = raw
            .tls
            .map(|tls| -> Result<TlsSettings, Report> {
                Ok(TlsSettings {
                    cert_path: absolute(&tls.cert_path)?,
                    key_path: absolute(&tls.key_path)?,
                })
            })
            .transpose()?;

        Ok(Self {
            host: raw.host,
            port: raw.port,
            allowed_origins: raw.allowed_origins,
            public_url: raw.public_url,
            tls,
        })
    }
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = Report;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        raw.map.validate()?;
        Ok(Self {
            api: raw.api.try_into()?,
            logging: raw.logging,
            secrets: raw.secrets,
            database: raw.database,
            map: raw.map,
        })
    }
}

impl MapSettings {
    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.default_page_size < 1 || self.max_page_size < 1 {
            bail!("map page sizes must be at least 1");
        }
        if self.default_page_size > self.max_page_size {
            bail!(
                "map.default_page_size ({}) exceeds map.max_page_size ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        if !self.marker_fly_to_zoom.is_finite() {
            bail!("map.marker_fly_to_zoom must be a finite zoom level");
        }
        Ok(())
    }

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            cluster_threshold: 150,
            debounce_ms: 300,
            default_page_size: 20,
            max_page_size: 100,
            marker_fly_to_zoom: 14.0,
        }
    }
}
