use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One calendar day's financial observation, parsed from the CSV.
///
/// Absence of a figure is `None`, never zero. The builder guarantees every
/// record carries a valid date; the numeric fields are independently
/// optional. Records are only meaningful as part of a date-sorted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub revenue: Option<f64>,
    pub cost: Option<f64>,
    pub profit: Option<f64>,
}

impl DayRecord {
    pub fn new(
        date: NaiveDate,
        revenue: Option<f64>,
        cost: Option<f64>,
        profit: Option<f64>,
    ) -> Self {
        Self { date, revenue, cost, profit }
    }
}

/// The aggregated dashboard metrics for one read of the series.
///
/// `today` and `delta` are `None` only when the series itself gives them no
/// meaning (empty series, or no usable previous record); `mtd` and `avg7`
/// are always numeric, defaulting to 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Profit of the most recent record (0.0-substituted when absent).
    pub today: Option<f64>,
    /// Month-to-date profit sum, targeting the month of `last_date`.
    pub mtd: f64,
    /// Mean profit over the last 7 records that carry a profit.
    pub avg7: f64,
    /// Day-over-day change versus the previous record.
    pub delta: Option<f64>,
    /// Date of the most recent record.
    pub last_date: Option<NaiveDate>,
}

impl KpiSnapshot {
    /// The snapshot for an empty series.
    pub fn empty() -> Self {
        Self {
            today: None,
            mtd: 0.0,
            avg7: 0.0,
            delta: None,
            last_date: None,
        }
    }
}

/// One point of the profit time series as served over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub profit: f64,
}

/// A single quoted exchange rate from an NBP table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CurrencyRate {
    /// Effective date of the table the rate was published in.
    pub as_of_date: NaiveDate,
    /// Currency code, e.g. "USD", "EUR".
    pub ticker: String,
    /// Mid exchange rate in PLN.
    pub mid: Decimal,
    /// Full name of the currency as published by the bank.
    pub name: String,
}
