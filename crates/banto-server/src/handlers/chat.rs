//! Analysis chat endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use banto_core::{Analyst, AnalystResponse, RecordQuery, StoreFilter};

use crate::{AppError, AppState};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// "all" or a store id; defaults to all stores
    #[serde(default)]
    pub store_filter: StoreFilter,
}

/// POST /api/chat - run one natural-language query against the record set
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AnalystResponse>, AppError> {
    let records = state.db.list_daily_records(&RecordQuery::default())?;
    let stores = state.db.list_stores()?;
    let today = Utc::now().date_naive();

    let analyst = Analyst::new(stores);
    let response = analyst.analyze(&request.query, &records, &request.store_filter, today);

    info!(
        query = %request.query,
        filter = %request.store_filter,
        records = records.len(),
        "Chat query analyzed"
    );

    Ok(Json(response))
}
