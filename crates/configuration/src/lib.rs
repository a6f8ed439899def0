use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{BacktestSettings, Config, DataSource, MACrossoverParams, Overrides};

/// The file read when no other path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Prefix of environment variables that override file values,
/// e.g. `MACROSS__STRATEGY__SHORT_WINDOW=20`.
pub const ENV_PREFIX: &str = "MACROSS";

/// Loads the application configuration from `path`, layered with `MACROSS__*`
/// environment variables, and validates it.
///
/// Every section has defaults, so a missing file is not an error: SP500 from
/// 2016-01-01 with 30/120 bar windows, 100000 capital and 10 units.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration like `load_config`, replaces any values given in
/// `overrides`, and validates the result once.
///
/// A value in the file that an override replaces is never checked on its own.
pub fn load_config_with_overrides(
    path: &Path,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    read_config(path)?.apply_overrides(overrides)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    tracing::debug!(?config, "Loaded configuration from {}", path.display());
    Ok(config)
}
