use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::debug;

/// Loads `config/settings.yaml` relative to the working directory, with `.env` overrides.
pub fn load_app_settings() -> Result<AppSettings> {
    load_settings_from_path(
        Path::new("config/settings.yaml"),
        Some(Path::new(".env")),
    )
}

/// Loads settings from a yaml file. Environment variables prefixed with `APP__` take precedence,
/// e.g. `APP__SECRETS__DATABASE_URL`.
pub fn load_settings_from_path(path: &Path, env_file: Option<&Path>) -> Result<AppSettings> {
    // Need to load from dotenv to get it to overwrite values from the environment.
    if let Some(env_file) = env_file {
        dotenv::from_path(env_file).ok();
    }
    let config_path = path.canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    raw_settings.try_into()
}
