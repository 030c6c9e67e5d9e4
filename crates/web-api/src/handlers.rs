use crate::error::ApiError;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Local;
use hk_ipo_data::{IpoCalendar, IpoRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;
/// Reported when the calendar returned no source (empty upstream table).
pub const FALLBACK_SOURCE: &str = "AkShare";

#[derive(Clone)]
pub struct AppState {
    pub calendar: Arc<IpoCalendar>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Raw query string values; parsed by hand so every failure is a 422.
#[derive(Debug, Default, Deserialize)]
pub struct IpoQuery {
    pub refresh: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IpoCalendarResponse {
    pub source: String,
    /// Local wall-clock time of the response, `YYYY-MM-DD HH:MM`.
    pub as_of: String,
    pub count: usize,
    pub items: Vec<IpoRecord>,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/ipo?refresh=<bool>&limit=<1..=200>
///
/// # Errors
/// Returns 422 for invalid parameters, 500 when no upstream is configured,
/// and 502 when the upstream fetch fails.
pub async fn list_ipos(
    State(state): State<AppState>,
    query: Result<Query<IpoQuery>, QueryRejection>,
) -> Result<Json<IpoCalendarResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    let refresh = parse_refresh(query.refresh.as_deref())?;
    let limit = parse_limit(query.limit.as_deref())?;

    let payload = state.calendar.get_items(refresh).await?;
    let items: Vec<IpoRecord> = payload.items.iter().take(limit).cloned().collect();

    Ok(Json(IpoCalendarResponse {
        source: payload
            .source
            .unwrap_or_else(|| FALLBACK_SOURCE.to_string()),
        as_of: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        count: items.len(),
        items,
    }))
}

/// Accepts the usual spellings of a boolean flag; absent means `false`.
pub fn parse_refresh(value: Option<&str>) -> Result<bool, ApiError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(ApiError::Validation(format!(
            "refresh: value could not be parsed to a boolean: {value:?}"
        ))),
    }
}

/// Parses `limit`, defaulting to 50 and enforcing `1..=200`.
pub fn parse_limit(value: Option<&str>) -> Result<usize, ApiError> {
    let Some(value) = value else {
        return Ok(DEFAULT_LIMIT);
    };
    let limit: i64 = value.trim().parse().map_err(|_| {
        ApiError::Validation(format!("limit: value is not a valid integer: {value:?}"))
    })?;
    if !(1..=MAX_LIMIT as i64).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit: must be between 1 and {MAX_LIMIT}, got {limit}"
        )));
    }
    Ok(limit as usize)
}
