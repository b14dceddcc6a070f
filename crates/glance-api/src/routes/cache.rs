use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use glance_persist::{SourcePost, SummaryRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    response::ApiResponse,
    routes::{parse_query, require_handle},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CacheQuery {
    pub handle: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheData {
    pub summary: SummaryRecord,
    pub posts: Vec<SourcePost>,
}

/// What the cache holds for a handle, without refreshing it
pub async fn inspect_cache(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CacheQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<CacheData>>> {
    let query = parse_query(query)?;
    let handle = require_handle(query.handle)?;

    let (summary, posts) = state
        .summaries
        .cached(&handle)
        .await?
        .ok_or_else(|| ApiError::NotFound("No cached summary found".to_string()))?;

    Ok(ApiResponse::ok(CacheData { summary, posts }))
}
