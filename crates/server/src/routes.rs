use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{TimeDelta, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sponsorgrid_core::dates::format_iso;
use sponsorgrid_core::{ApiResponse, Sponsor, SponsorData};
use sponsorgrid_engine::facets::{table_industries, unique_industries, unique_locations};
use sponsorgrid_engine::{
    compute_stats, search, search_table, Page, Params, SearchFilters, SponsorStats, TableFilters,
};
use sponsorgrid_io::export::sponsor_data_to_csv;
use sponsorgrid_io::{load_section, section_counts, DataSection, SectionCounts};
use sponsorgrid_register_client::{IngestOutcome, SOURCE_PAGE_URL};

use crate::error::AppError;
use crate::refresh::run_ingest;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub async fn ping_handler(State(state): State<AppState>) -> ApiResult<Value> {
    ok(json!({ "message": state.settings.server.ping_message }))
}

pub async fn health_handler(State(state): State<AppState>) -> ApiResult<Value> {
    ok(json!({
        "status": "ok",
        "timestamp": format_iso(&Utc::now()),
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "environment": state.settings.server.environment,
    }))
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<Params>,
) -> ApiResult<Page<Sponsor>> {
    let filters = SearchFilters::from_params(&params);
    ok(search(&state.catalog, &filters))
}

pub async fn stats_handler(State(state): State<AppState>) -> ApiResult<SponsorStats> {
    ok(compute_stats(&state.catalog, Utc::now()))
}

pub async fn industries_handler(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    ok(unique_industries(&state.catalog))
}

pub async fn locations_handler(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    ok(unique_locations(&state.catalog))
}

pub async fn sponsor_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Sponsor> {
    state
        .catalog
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Sponsor not found".into()))
        .and_then(ok)
}

// ---------------------------------------------------------------------------
// Tabular datasets
// ---------------------------------------------------------------------------

fn parse_section(raw: &str) -> Result<DataSection, AppError> {
    raw.parse().map_err(AppError::NotFound)
}

async fn load_rows(state: &AppState, section: DataSection) -> Result<Vec<SponsorData>, AppError> {
    let dir = state.settings.data.dir.clone();
    let loaded = tokio::task::spawn_blocking(move || load_section(&dir, section))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    loaded.map_err(|e| {
        if e.is_not_found() {
            tracing::warn!(%section, error = %e, "data section missing");
        } else {
            tracing::error!(%section, error = %e, "data section unreadable");
        }
        AppError::Unavailable(format!("Failed to load {section} data"))
    })
}

pub async fn data_stats_handler(State(state): State<AppState>) -> ApiResult<SectionCounts> {
    let dir = state.settings.data.dir.clone();
    let counts = tokio::task::spawn_blocking(move || section_counts(&dir))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    ok(counts)
}

pub async fn data_section_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> ApiResult<Vec<SponsorData>> {
    let section = parse_section(&section)?;
    ok(load_rows(&state, section).await?)
}

pub async fn data_search_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(params): Query<Params>,
) -> ApiResult<Page<SponsorData>> {
    let section = parse_section(&section)?;
    let rows = load_rows(&state, section).await?;
    ok(search_table(&rows, &TableFilters::from_params(&params)))
}

pub async fn data_industries_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> ApiResult<Vec<String>> {
    let section = parse_section(&section)?;
    ok(table_industries(&load_rows(&state, section).await?))
}

pub async fn data_export_handler(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let section = parse_section(&section)?;
    let rows = load_rows(&state, section).await?;
    let csv = sponsor_data_to_csv(&rows).map_err(|e| AppError::Internal(e.to_string()))?;

    let disposition = format!("attachment; filename=\"{section}-sponsors.csv\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

// ---------------------------------------------------------------------------
// Live register
// ---------------------------------------------------------------------------

async fn ingest_now(state: &AppState) -> Result<IngestOutcome, AppError> {
    run_ingest(state.source.clone())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn data_source(outcome: &IngestOutcome) -> &'static str {
    if outcome.is_fallback() {
        "fallback"
    } else {
        "live"
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub message: &'static str,
    pub record_count: usize,
    pub skipped_count: usize,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    pub timestamp: String,
}

pub async fn sync_handler(State(state): State<AppState>) -> ApiResult<SyncReport> {
    let outcome = ingest_now(&state).await?;
    ok(SyncReport {
        message: "Sync completed successfully",
        record_count: outcome.sponsors().len(),
        skipped_count: outcome.skipped_count(),
        source: data_source(&outcome),
        fallback_reason: outcome.fallback_reason().map(|r| r.to_string()),
        timestamp: format_iso(&Utc::now()),
    })
}

pub async fn status_handler(State(state): State<AppState>) -> ApiResult<Value> {
    let outcome = ingest_now(&state).await?;
    let status = outcome.status(Utc::now());
    ok(json!({
        "dataSource": "UK Home Office Register of Licensed Sponsors",
        "sourceUrl": SOURCE_PAGE_URL,
        "registerUrl": state.source.describe(),
        "lastUpdated": format_iso(&status.last_updated),
        "totalRecords": status.total_records,
        "status": status.status,
        "features": {
            "dailySync": state.refresh.is_scheduled(),
            "officialSource": true,
            "dataValidation": true,
        },
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSponsors {
    pub sponsors: Vec<Sponsor>,
    pub total_available: usize,
    pub data_source: &'static str,
    pub fallback: bool,
    pub last_updated: String,
}

pub async fn latest_handler(State(state): State<AppState>) -> ApiResult<LatestSponsors> {
    let outcome = ingest_now(&state).await?;
    let fallback = outcome.is_fallback();
    let mut sponsors = outcome.into_sponsors();
    let total_available = sponsors.len();
    sponsors.truncate(state.settings.register.latest_limit);

    ok(LatestSponsors {
        sponsors,
        total_available,
        data_source: "UK Home Office Register",
        fallback,
        last_updated: format_iso(&Utc::now()),
    })
}

pub async fn schedule_handler(State(state): State<AppState>) -> ApiResult<Value> {
    let register = &state.settings.register;
    let newly = state.refresh.schedule(state.source.clone(), register.refresh_interval());

    let hours = register.refresh_interval_hours;
    let next = i64::try_from(hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .and_then(|d| Utc::now().checked_add_signed(d));
    let message = if newly {
        "Daily updates scheduled successfully"
    } else {
        "Daily updates already scheduled"
    };

    ok(json!({
        "message": message,
        "interval": format!("{hours} hours"),
        "nextUpdate": next.map(|t| format_iso(&t)),
    }))
}
