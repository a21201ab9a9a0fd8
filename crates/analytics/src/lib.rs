//! # Kpiboard Analytics Crate
//!
//! Derives the dashboard metrics from the ordered `DayRecord` series. The
//! engine is total: absence of data flows out through the optionality of
//! the snapshot fields, never through an error.

pub mod engine;

pub use engine::KpiEngine;
