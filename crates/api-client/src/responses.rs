use chrono::NaiveDate;
use core_types::CurrencyRate;
use rust_decimal::Decimal;
use serde::Deserialize;

// `#[serde(rename_all = "camelCase")]` maps the JSON camelCase fields to
// Rust snake_case.

/// One published rate table from `GET /exchangerates/tables/{table}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub table: String,
    /// Publication number, e.g. "192/A/NBP/2025".
    pub no: String,
    pub effective_date: NaiveDate,
    pub rates: Vec<QuotedRate>,
}

/// A single quoted currency within a table.
#[derive(Debug, Clone, Deserialize)]
pub struct QuotedRate {
    /// Full currency name as published, e.g. "dolar amerykański".
    pub currency: String,
    /// Currency code, e.g. "USD".
    pub code: String,
    /// Mid exchange rate in PLN.
    pub mid: Decimal,
}

impl RateTable {
    /// Flattens the table into one `CurrencyRate` per quoted currency,
    /// stamping each with the table's effective date.
    pub fn into_rates(self) -> Vec<CurrencyRate> {
        let as_of_date = self.effective_date;
        self.rates
            .into_iter()
            .map(|r| CurrencyRate {
                as_of_date,
                ticker: r.code,
                mid: r.mid,
                name: r.currency,
            })
            .collect()
    }
}
