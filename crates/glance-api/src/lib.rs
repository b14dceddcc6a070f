pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use axum::{
    error_handling::HandleErrorLayer,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::routes::{
    cache, chat, handle_middleware_error, health, method_not_allowed, not_found, posts, summary,
};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.timeout);
    let cors = build_cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(health::health_check).fallback(method_not_allowed))
        .route(
            "/summary",
            get(summary::get_summary)
                .delete(summary::delete_summary)
                .fallback(method_not_allowed),
        )
        .route("/chat", post(chat::chat).fallback(method_not_allowed))
        .route("/posts", get(posts::list_posts).fallback(method_not_allowed))
        .route("/cache", get(cache::inspect_cache).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(axum_middleware::from_fn(middleware::logging::log_request))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::permissive();
    }

    let mut cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    cors
}
