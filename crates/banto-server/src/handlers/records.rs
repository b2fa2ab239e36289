//! Health, store, and daily record handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use banto_core::{import_csv, DailyRecord, ImportResult, NewDailyRecord, RecordQuery, Store};

use crate::{AppError, AppState, SuccessResponse};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub record_count: usize,
}

/// GET /api/health
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, AppError> {
    let records = state.db.list_daily_records(&RecordQuery::default())?;
    Ok(Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
        record_count: records.len(),
    }))
}

/// GET /api/stores
pub async fn list_stores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Store>>, AppError> {
    Ok(Json(state.db.list_stores()?))
}

#[derive(Deserialize, Default)]
pub struct ListRecordsParams {
    pub store_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
}

impl ListRecordsParams {
    fn into_query(self) -> RecordQuery {
        RecordQuery {
            store_id: self.store_id,
            start: self.from,
            end: self.to,
            limit: self.limit,
        }
    }
}

/// GET /api/records
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRecordsParams>,
) -> Result<Json<Vec<DailyRecord>>, AppError> {
    Ok(Json(state.db.list_daily_records(&params.into_query())?))
}

/// POST /api/records - upsert a daily record by (date, store)
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewDailyRecord>,
) -> Result<(StatusCode, Json<DailyRecord>), AppError> {
    let record = state.db.upsert_daily_record(&new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/records/:id
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DailyRecord>, AppError> {
    Ok(Json(state.db.get_daily_record(id)?))
}

/// DELETE /api/records/:id
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_daily_record(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/records/import - raw CSV body
pub async fn import_records(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ImportSummary>, AppError> {
    let result = import_csv(&state.db, body.as_bytes())?;
    Ok(Json(ImportSummary::from(result)))
}

#[derive(Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub replaced: usize,
}

impl From<ImportResult> for ImportSummary {
    fn from(r: ImportResult) -> Self {
        Self {
            imported: r.imported,
            replaced: r.replaced,
        }
    }
}

#[derive(Deserialize)]
pub struct SummaryParams {
    /// daily | weekly | monthly
    #[serde(default = "default_period_type")]
    pub period_type: String,
    pub store_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

fn default_period_type() -> String {
    "daily".to_string()
}

#[derive(Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub sales: f64,
    pub expenses: f64,
    /// Sales minus purchase cost
    pub gross_profit: f64,
    /// Sales minus all expenses
    pub operating_profit: f64,
    pub profit_margin: f64,
    pub record_count: usize,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub period_type: String,
    pub periods: Vec<PeriodSummary>,
    pub total_sales: f64,
    pub total_expenses: f64,
    pub total_gross_profit: f64,
    pub total_operating_profit: f64,
}

/// GET /api/records/summary - per-period profit rollup
pub async fn records_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, AppError> {
    let period_key: fn(NaiveDate) -> String = match params.period_type.as_str() {
        "daily" => |d| d.to_string(),
        "weekly" => |d| {
            let week = d.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        },
        "monthly" => |d| format!("{}-{:02}", d.year(), d.month()),
        other => {
            return Err(AppError::bad_request(&format!(
                "Unknown period_type: {}",
                other
            )))
        }
    };

    let records = state.db.list_daily_records(&RecordQuery {
        store_id: params.store_id.clone(),
        start: params.from,
        end: params.to,
        limit: None,
    })?;

    // BTreeMap keeps the period keys chronologically ordered
    let mut buckets: BTreeMap<String, (f64, f64, f64, usize)> = BTreeMap::new();
    for r in &records {
        let entry = buckets.entry(period_key(r.date)).or_default();
        entry.0 += r.sales;
        entry.1 += r.total_expenses();
        entry.2 += r.purchase;
        entry.3 += 1;
    }

    let periods: Vec<PeriodSummary> = buckets
        .into_iter()
        .map(|(period, (sales, expenses, purchase, count))| {
            let operating_profit = sales - expenses;
            PeriodSummary {
                period,
                sales,
                expenses,
                gross_profit: sales - purchase,
                operating_profit,
                profit_margin: if sales > 0.0 {
                    operating_profit / sales * 100.0
                } else {
                    0.0
                },
                record_count: count,
            }
        })
        .collect();

    Ok(Json(SummaryResponse {
        period_type: params.period_type,
        total_sales: periods.iter().map(|p| p.sales).sum(),
        total_expenses: periods.iter().map(|p| p.expenses).sum(),
        total_gross_profit: periods.iter().map(|p| p.gross_profit).sum(),
        total_operating_profit: periods.iter().map(|p| p.operating_profit).sum(),
        periods,
    }))
}
