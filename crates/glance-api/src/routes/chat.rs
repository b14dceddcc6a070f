use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "username")]
    pub handle: Option<String>,
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatData {
    pub response: String,
}

/// Answer a question from the posts stored with a handle's summary
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<ChatData>>> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;

    let (Some(handle), Some(question)) = (req.handle, req.question) else {
        return Err(ApiError::BadRequest("Handle and question are required".to_string()));
    };

    tracing::info!(%handle, "Chat question received");
    let response = state.answerer.answer_question(&handle, &question).await?;

    Ok(ApiResponse::ok(ChatData { response }))
}
