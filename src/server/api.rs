//! API routes and handlers

use super::{AppState, ServerError};
use crate::engine::{Recommendation, RecommendRequest};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. See /api/health for API status.",
        })),
    )
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/recommend", post(recommend))
        .route("/meta", get(meta))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// POST /api/recommend
async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<Recommendation>, ServerError> {
    let recommendation = state.recommender.recommend(&request)?;
    info!(
        fertilizer = %recommendation.fertilizer,
        optimized_amount = recommendation.optimized_amount,
        crop_fallback = recommendation.crop_fallback.is_some(),
        "Recommendation served"
    );
    Ok(Json(recommendation))
}

/// GET /api/meta - label sets for the UI's input dropdowns
async fn meta(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "soil_types": state.recommender.soil_types(),
        "crop_types": state.recommender.crop_types(),
        "fertilizers": state.recommender.fertilizer_names(),
    }))
}

/// GET /api/health
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
