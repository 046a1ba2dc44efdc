use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{DatabaseSettings, LoggingSettings, ServerOverrides, ServerSettings, Settings};

/// Prefix of the environment variables that override file settings,
/// e.g. `REALTY__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "REALTY";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config.toml"))
}

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at `path`
/// (optional), and `REALTY__*` environment variables.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
