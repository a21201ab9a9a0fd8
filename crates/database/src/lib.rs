//! # Kpiboard Database Crate
//!
//! The Postgres adapter for the currency-rates archive. It encapsulates
//! all SQL so the rest of the application talks to a small, typed API:
//!
//! - `connect`: establish the pooled connection from `DATABASE_URL`.
//! - `run_migrations`: apply the embedded migrations at startup.
//! - `DbRepository`: the high-level data access methods (rate upsert and
//!   lookups).
//! - `DbError`: the error surface of this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
