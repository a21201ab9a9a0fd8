use config::builder::DefaultState;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, DataConfig, RatesConfig, ServerConfig};

/// The built-in defaults, as a builder stage so tests can materialize
/// them without touching the file system or the environment.
fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("data.csv_path", "data.csv")?
        .set_default("rates.base_url", "https://api.nbp.pl/api")?
        .set_default("rates.table", "A")?;
    Ok(builder)
}

/// Loads the application configuration.
///
/// Layering, lowest precedence first: built-in defaults, an optional
/// `config.toml` next to the binary, then `KPI__`-prefixed environment
/// variables (e.g. `KPI__DATA__CSV_PATH`). The app runs with no file at
/// all, which is the common case for local development.
pub fn load_config() -> Result<Config, ConfigError> {
    let config = defaults()?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("KPI").separator("__"))
        .build()?
        .try_deserialize::<Config>()?;

    Ok(config)
}

/// The optional dashboard API key. Set `API_KEY` in the environment to
/// require an `X-API-Key` header on every data endpoint.
pub fn api_key_from_env() -> Option<String> {
    std::env::var("API_KEY").ok().filter(|k| !k.is_empty())
}

#[cfg(test)]
pub(crate) fn defaults_only() -> Result<Config, ConfigError> {
    Ok(defaults()?.build()?.try_deserialize::<Config>()?)
}
