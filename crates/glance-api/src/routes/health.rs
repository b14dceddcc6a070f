use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub integrations: IntegrationStatus,
    pub storage: StorageStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationStatus {
    pub posts: bool,
    pub llm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageStatus {
    pub backend: String,
    pub connected: bool,
}

/// Health check endpoint
///
/// Always 200; reports which integrations are configured and whether the
/// cache store answers a ping.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let integrations = state.summaries.integrations();
    let store = state.summaries.store();

    let connected = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = store.backend(), error = %e, "Cache store ping failed");
            false
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        integrations: IntegrationStatus {
            posts: integrations.posts,
            llm: integrations.llm,
        },
        storage: StorageStatus {
            backend: store.backend().to_string(),
            connected,
        },
    })
}
