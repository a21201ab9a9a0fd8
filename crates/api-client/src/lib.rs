use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::RatesConfig;
use core_types::CurrencyRate;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{QuotedRate, RateTable};

/// The abstract interface for an exchange-rates source. The sync job runs
/// against this trait, so the concrete HTTP client can be swapped for a
/// mock in tests.
#[async_trait]
pub trait RatesApi: Send + Sync {
    /// Fetches the published rate table, flattened to one `CurrencyRate`
    /// per quoted currency. `date` of `None` means the latest table.
    async fn fetch_rates(&self, date: Option<NaiveDate>) -> Result<Vec<CurrencyRate>, ApiError>;
}

/// A concrete `RatesApi` implementation for the National Bank of Poland's
/// public exchange-rates API.
#[derive(Clone)]
pub struct NbpClient {
    client: reqwest::Client,
    base_url: String,
    table: String,
}

impl NbpClient {
    pub fn new(config: &RatesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
        }
    }

    fn table_url(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => format!(
                "{}/exchangerates/tables/{}/{}/?format=json",
                self.base_url, self.table, d
            ),
            None => format!(
                "{}/exchangerates/tables/{}/?format=json",
                self.base_url, self.table
            ),
        }
    }
}

#[async_trait]
impl RatesApi for NbpClient {
    async fn fetch_rates(&self, date: Option<NaiveDate>) -> Result<Vec<CurrencyRate>, ApiError> {
        let url = self.table_url(date);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // NBP answers 404 with a plain-text body, e.g. when no table
            // was published for the requested date (weekends, holidays).
            return Err(ApiError::Http(status.as_u16(), text));
        }

        // The API wraps the table in a one-element array.
        let tables: Vec<RateTable> =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        let table = tables
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidData("empty table array in response".to_string()))?;

        Ok(table.into_rates())
    }
}
