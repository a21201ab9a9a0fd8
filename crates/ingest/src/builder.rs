use crate::error::IngestError;
use crate::parse::{parse_amount, parse_date};
use core_types::DayRecord;
use std::collections::HashMap;
use std::path::Path;

// Header synonyms, matched against lowercased, trimmed header names. The
// source sheets come in both English and Polish.
const DATE_KEYS: [&str; 2] = ["date", "data"];
const REVENUE_KEYS: [&str; 3] = ["revenue", "przychod", "przychód"];
const COST_KEYS: [&str; 3] = ["cost", "koszt", "koszty"];
const PROFIT_KEYS: [&str; 2] = ["profit", "zysk"];

/// A raw row: lowercased header name to raw string value.
pub type RawRow = HashMap<String, String>;

fn field<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| row.get(*k).map(String::as_str).filter(|v| !v.is_empty()))
}

/// Builds the ordered record series from raw rows.
///
/// Rows whose date cannot be parsed are dropped. Revenue, cost and profit
/// are independently optional; a missing profit is derived as
/// `revenue - cost` when both are present. The output is stably sorted by
/// date ascending; duplicate dates are kept as separate records.
pub fn build_series<I>(rows: I) -> Vec<DayRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut records: Vec<DayRecord> = Vec::new();
    for row in rows {
        let Some(date) = field(&row, &DATE_KEYS).and_then(parse_date) else {
            tracing::debug!(?row, "dropping row with unparsable date");
            continue;
        };
        let revenue = field(&row, &REVENUE_KEYS).and_then(parse_amount);
        let cost = field(&row, &COST_KEYS).and_then(parse_amount);
        let mut profit = field(&row, &PROFIT_KEYS).and_then(parse_amount);
        if profit.is_none() {
            if let (Some(r), Some(c)) = (revenue, cost) {
                profit = Some(r - c);
            }
        }
        records.push(DayRecord::new(date, revenue, cost, profit));
    }
    records.sort_by_key(|r| r.date);
    records
}

/// Reads and builds the series from CSV text.
pub fn read_csv_str(text: &str) -> Result<Vec<DayRecord>, IngestError> {
    // Flexible: short or long rows are zipped against the headers rather
    // than failing the whole read.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows: Vec<RawRow> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    Ok(build_series(rows))
}

/// Reads and builds the series from the CSV file at `path`.
///
/// A missing file is an empty series, not an error: the dashboard starts
/// out with no data until the first upload.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<DayRecord>, IngestError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "CSV source missing, serving empty series");
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    read_csv_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unparsable_date_drops_exactly_that_row() {
        let rows = vec![
            row(&[("date", "2024-01-01"), ("profit", "10")]),
            row(&[("date", "not-a-date"), ("profit", "99")]),
            row(&[("date", "2024-01-02"), ("profit", "20")]),
        ];
        let series = build_series(rows);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, d(2024, 1, 1));
        assert_eq!(series[1].date, d(2024, 1, 2));
    }

    #[test]
    fn profit_derived_from_revenue_minus_cost() {
        let series = build_series(vec![row(&[
            ("date", "2024-01-01"),
            ("revenue", "100"),
            ("cost", "40"),
        ])]);
        assert_eq!(series[0].profit, Some(60.0));
        assert_eq!(series[0].revenue, Some(100.0));
        assert_eq!(series[0].cost, Some(40.0));
    }

    #[test]
    fn explicit_profit_wins_over_derivation() {
        let series = build_series(vec![row(&[
            ("date", "2024-01-01"),
            ("revenue", "100"),
            ("cost", "40"),
            ("profit", "55"),
        ])]);
        assert_eq!(series[0].profit, Some(55.0));
    }

    #[test]
    fn profit_stays_absent_when_a_leg_is_missing() {
        let series = build_series(vec![row(&[("date", "2024-01-01"), ("revenue", "100")])]);
        assert_eq!(series[0].profit, None);
    }

    #[test]
    fn output_is_sorted_by_date() {
        let rows = vec![
            row(&[("date", "2024-01-03"), ("profit", "3")]),
            row(&[("date", "2024-01-01"), ("profit", "1")]),
            row(&[("date", "2024-01-02"), ("profit", "2")]),
        ];
        let series = build_series(rows);
        let dates: Vec<_> = series.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]);
    }

    #[test]
    fn duplicate_dates_are_kept() {
        let rows = vec![
            row(&[("date", "2024-01-01"), ("profit", "1")]),
            row(&[("date", "2024-01-01"), ("profit", "2")]),
        ];
        assert_eq!(build_series(rows).len(), 2);
    }

    #[test]
    fn polish_headers_resolve() {
        let series = build_series(vec![row(&[
            ("data", "01.02.2024"),
            ("przychod", "200"),
            ("koszty", "50"),
        ])]);
        assert_eq!(series[0].date, d(2024, 2, 1));
        assert_eq!(series[0].profit, Some(150.0));
    }

    #[test]
    fn csv_text_end_to_end() {
        let csv = "Date,Revenue,Cost\n2024-05-01,100,30\n";
        let series = read_csv_str(csv).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].profit, Some(70.0));
    }

    #[test]
    fn missing_file_is_empty_series() {
        let series = read_csv_file("/nonexistent/kpiboard-data.csv").unwrap();
        assert!(series.is_empty());
    }
}
