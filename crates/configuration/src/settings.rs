use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub rates: RatesConfig,
}

/// Bind parameters for the web server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the daily-figures CSV lives.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the CSV file read by the KPI endpoints and replaced by
    /// uploads.
    pub csv_path: PathBuf,
}

/// Parameters for the NBP exchange-rates API.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Which published table to fetch ("A" carries the mid rates).
    pub table: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        // Built from the defaults stage only, so a config.toml in the CWD
        // or KPI__-prefixed environment variables cannot skew the assert.
        let config = crate::defaults_only().expect("defaults should always load");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.data.csv_path, PathBuf::from("data.csv"));
        assert_eq!(config.rates.base_url, "https://api.nbp.pl/api");
        assert_eq!(config.rates.table, "A");
    }
}
