//! # Kpiboard Ingest Crate
//!
//! Turns the raw daily-figures CSV into the ordered `DayRecord` series the
//! aggregator consumes. The ingest policy is deliberately permissive: rows
//! with an unparsable date are dropped, unparsable numbers become absent
//! fields, and a missing file reads as an empty series. Malformed input
//! degrades the series instead of failing the request.

pub mod builder;
pub mod error;
pub mod parse;

pub use builder::{build_series, read_csv_file, read_csv_str};
pub use error::IngestError;
