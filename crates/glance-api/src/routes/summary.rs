use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use glance_core::SummaryMode;
use glance_persist::SummaryRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, response::ApiResponse, routes::{parse_query, require_handle}, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub handle: Option<String>,
    pub detailed: Option<String>,
}

impl SummaryQuery {
    fn mode(&self) -> SummaryMode {
        match self.detailed.as_deref() {
            Some("true") | Some("1") => SummaryMode::Detailed,
            _ => SummaryMode::Brief,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    pub summary_text: String,
    pub tags: Vec<String>,
    pub handle_echo: String,
    pub display_name: String,
    pub post_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<String>,
}

impl SummaryData {
    /// Detail fields are only exposed to detailed requests, and only when stored
    fn from_record(record: SummaryRecord, mode: SummaryMode) -> Self {
        let detail = match mode {
            SummaryMode::Detailed => record.detail,
            SummaryMode::Brief => None,
        };

        Self {
            display_name: record.display_name.unwrap_or_else(|| record.handle.clone()),
            summary_text: record.summary_text,
            tags: record.tags,
            handle_echo: record.handle,
            post_count: record.source_post_count,
            topics: detail.as_ref().map(|d| d.topics.clone()),
            sentiment: detail.as_ref().map(|d| d.sentiment.clone()),
            engagement: detail.map(|d| d.engagement),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteData {
    pub deleted: bool,
}

/// Cached summary for a handle, refreshed when stale or missing
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<SummaryData>>> {
    let query = parse_query(query)?;
    let mode = query.mode();
    let handle = require_handle(query.handle)?;

    tracing::info!(%handle, ?mode, "Summary requested");
    let record = state.summaries.get_or_refresh_summary(&handle, mode).await?;

    Ok(ApiResponse::ok(SummaryData::from_record(record, mode)))
}

pub async fn delete_summary(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<DeleteData>>> {
    let query = parse_query(query)?;
    let handle = require_handle(query.handle)?;
    let deleted = state.summaries.delete_summary(&handle).await?;
    Ok(ApiResponse::ok(DeleteData { deleted }))
}
