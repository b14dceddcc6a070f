use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use glance_source::{Author, CleanPost};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, response::ApiResponse, routes::{parse_query, require_handle}, state::AppState};

const DIAGNOSTIC_POST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub handle: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsData {
    pub author: Author,
    pub posts: Vec<CleanPost>,
    pub count: usize,
}

/// Live fetch of a handle's cleaned posts; nothing is cached
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PostsQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<PostsData>>> {
    let query = parse_query(query)?;
    let handle = require_handle(query.handle)?;

    let fetched = state
        .summaries
        .recent_posts(&handle, DIAGNOSTIC_POST_LIMIT)
        .await?;

    Ok(ApiResponse::ok(PostsData {
        count: fetched.posts.len(),
        author: fetched.author,
        posts: fetched.posts,
    }))
}
