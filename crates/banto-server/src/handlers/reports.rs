//! Generated report, schedule, and generation log handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

use banto_core::{
    build_periodic_report, report_period, GeneratedReport, GenerationLog, GenerationStatus,
    NewReportSchedule, RecordQuery, ReportSchedule, ReportType, StoreFilter,
};

use crate::{AppError, AppState, SuccessResponse};

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub report_type: ReportType,
    #[serde(default)]
    pub store_id: Option<String>,
}

/// POST /api/reports/generate - build and persist a periodic report
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GeneratedReport>), AppError> {
    let stored = run_generation(
        &state.db,
        request.report_type,
        request.store_id.as_deref(),
        None,
    )?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Build one report, persist it, and record the generation attempt.
/// Shared between the generate endpoint and the scheduler.
pub(crate) fn run_generation(
    db: &banto_core::Database,
    report_type: ReportType,
    store_id: Option<&str>,
    schedule_id: Option<i64>,
) -> banto_core::Result<GeneratedReport> {
    let now = Utc::now();
    let today = now.date_naive();
    let filter = match store_id {
        Some(id) => StoreFilter::Store(id.to_string()),
        None => StoreFilter::All,
    };
    let generated_by = if schedule_id.is_some() {
        "schedule"
    } else {
        "manual"
    };

    let log_id = db.start_generation_log(schedule_id, report_type, store_id, now)?;

    let result = (|| {
        let (start, end) = report_period(report_type, today);
        let records = db.list_daily_records(&RecordQuery::default())?;
        let in_period = records
            .iter()
            .filter(|r| r.date >= start && r.date <= end && filter.matches(r))
            .count() as i64;
        let store_count = db.store_count_in_range(start, end)?;

        let report = build_periodic_report(&records, report_type, &filter, today, generated_by);
        let stored = db.insert_generated_report(&report)?;
        Ok::<_, banto_core::Error>((stored, in_period, store_count))
    })();

    match result {
        Ok((stored, record_count, store_count)) => {
            db.complete_generation_log(
                log_id,
                GenerationStatus::Success,
                Some(stored.id),
                None,
                record_count,
                store_count,
                Utc::now(),
            )?;
            info!(
                report_id = stored.id,
                report_type = %report_type,
                records = record_count,
                "Report generated"
            );
            Ok(stored)
        }
        Err(e) => {
            error!(error = %e, report_type = %report_type, "Report generation failed");
            db.complete_generation_log(
                log_id,
                GenerationStatus::Failed,
                None,
                Some(&e.to_string()),
                0,
                0,
                Utc::now(),
            )?;
            Err(e)
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ListReportsParams {
    pub report_type: Option<ReportType>,
    pub limit: Option<u32>,
}

/// GET /api/reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListReportsParams>,
) -> Result<Json<Vec<GeneratedReport>>, AppError> {
    let limit = params.limit.unwrap_or(50);
    Ok(Json(state.db.list_generated_reports(params.report_type, limit)?))
}

/// GET /api/reports/:id
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<GeneratedReport>, AppError> {
    Ok(Json(state.db.get_generated_report(id)?))
}

/// DELETE /api/reports/:id
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_generated_report(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

#[derive(Deserialize, Default)]
pub struct ListLogsParams {
    pub limit: Option<u32>,
}

/// GET /api/reports/logs
pub async fn list_generation_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListLogsParams>,
) -> Result<Json<Vec<GenerationLog>>, AppError> {
    Ok(Json(state.db.list_generation_logs(params.limit.unwrap_or(50))?))
}

/// GET /api/schedules
pub async fn list_schedules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReportSchedule>>, AppError> {
    Ok(Json(state.db.list_schedules()?))
}

/// POST /api/schedules
pub async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewReportSchedule>,
) -> Result<(StatusCode, Json<ReportSchedule>), AppError> {
    let schedule = state.db.insert_schedule(&new)?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[derive(Deserialize)]
pub struct UpdateScheduleRequest {
    pub is_enabled: Option<bool>,
}

/// PATCH /api/schedules/:id
pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateScheduleRequest>,
) -> Result<Json<ReportSchedule>, AppError> {
    if let Some(enabled) = update.is_enabled {
        state.db.set_schedule_enabled(id, enabled)?;
    }
    Ok(Json(state.db.get_schedule(id)?))
}

/// DELETE /api/schedules/:id
pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_schedule(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
