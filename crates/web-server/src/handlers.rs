use crate::{AppState, error::AppError};
use analytics::KpiEngine;
use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use core_types::{KpiSnapshot, SeriesPoint};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
    #[serde(default = "default_days")]
    days: usize,
}
fn default_days() -> usize {
    60
}

/// # GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # GET /api/kpi
///
/// Re-reads the CSV and aggregates it from scratch; there is no caching
/// between requests, so an upload is visible immediately.
pub async fn get_kpi(State(state): State<Arc<AppState>>) -> Result<Json<KpiSnapshot>, AppError> {
    let records = ingest::read_csv_file(&state.csv_path)?;
    let snapshot = KpiEngine::new().compute(&records);
    Ok(Json(snapshot))
}

/// # GET /api/series?days=60
///
/// The profit time series: the last `days` records (by position) that
/// carry a profit. `days` is clamped to 1..=365.
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> Result<Json<Vec<SeriesPoint>>, AppError> {
    let days = params.days.clamp(1, 365);

    let records = ingest::read_csv_file(&state.csv_path)?;
    let with_profit: Vec<SeriesPoint> = records
        .into_iter()
        .filter_map(|r| {
            r.profit.map(|profit| SeriesPoint {
                date: r.date,
                profit,
            })
        })
        .collect();

    let start = with_profit.len().saturating_sub(days);
    Ok(Json(with_profit[start..].to_vec()))
}

/// # POST /api/upload (multipart, field `file`)
///
/// Replaces the CSV wholesale. The body is decoded as UTF-8 with a
/// Latin-1 fallback, sanity-checked for a date header, and written to a
/// temporary sibling before renaming over the live file so concurrent
/// reads never see a torn write.
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(AppError::BadRequest("Only CSV allowed".to_string()));
        }

        let bytes = field.bytes().await?;
        let text = decode_csv_bytes(&bytes);

        let lower = text.to_lowercase();
        if !lower.contains("date") && !lower.contains("data") {
            return Err(AppError::BadRequest(
                "CSV must contain a date/data column".to_string(),
            ));
        }

        let tmp = state.csv_path.with_extension("csv.tmp");
        tokio::fs::write(&tmp, text.as_bytes()).await?;
        tokio::fs::rename(&tmp, &state.csv_path).await?;

        tracing::info!(bytes = bytes.len(), path = %state.csv_path.display(), "CSV replaced");
        return Ok(Json(json!({ "ok": true, "bytes": bytes.len() })));
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

/// UTF-8 with a Latin-1 fallback: in Latin-1 every byte maps to the code
/// point of the same value, so the fallback cannot fail.
fn decode_csv_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_fallback_round_trips_high_bytes() {
        // "koszt" with a Latin-1 ó is invalid UTF-8.
        let bytes = [b'k', b'o', b's', b'z', b't', 0xF3];
        assert_eq!(decode_csv_bytes(&bytes), "koszt\u{f3}");
        assert_eq!(decode_csv_bytes(b"date,profit"), "date,profit");
    }
}
