use crate::DbError;
use chrono::NaiveDate;
use core_types::CurrencyRate;
use sqlx::postgres::PgPool;

/// The `DbRepository` provides a high-level, application-specific
/// interface to the database. It encapsulates all SQL queries and data
/// access logic for the currency-rates archive.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a batch of rates, skipping any already on file.
    ///
    /// Idempotency lives in the primary key: `(as_of_date, ticker)` plus
    /// `ON CONFLICT DO NOTHING` makes re-running a sync a no-op for rows
    /// the archive already holds. Returns the number of genuinely new rows.
    pub async fn insert_rates(&self, rates: &[CurrencyRate]) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for rate in rates {
            let result = sqlx::query(
                r#"
                INSERT INTO currency_rates (as_of_date, currency_ticker, mid_rate, currency_name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (as_of_date, currency_ticker) DO NOTHING
                "#,
            )
            .bind(rate.as_of_date)
            .bind(&rate.ticker)
            .bind(rate.mid)
            .bind(&rate.name)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!(
            fetched = rates.len(),
            inserted,
            "rate upsert complete"
        );
        Ok(inserted)
    }

    /// Fetches all rates on file for a given effective date, ordered by
    /// ticker.
    pub async fn rates_for_date(&self, date: NaiveDate) -> Result<Vec<CurrencyRate>, DbError> {
        let rates = sqlx::query_as::<_, CurrencyRate>(
            r#"
            SELECT as_of_date, currency_ticker AS ticker, mid_rate AS mid, currency_name AS name
            FROM currency_rates
            WHERE as_of_date = $1
            ORDER BY currency_ticker
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    /// The most recent effective date in the archive, if any rates exist.
    pub async fn latest_rate_date(&self) -> Result<Option<NaiveDate>, DbError> {
        let row: (Option<NaiveDate>,) =
            sqlx::query_as("SELECT MAX(as_of_date) FROM currency_rates")
                .fetch_one(&self.pool)
                .await?;

        Ok(row.0)
    }
}
