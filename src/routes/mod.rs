use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::recommendations::RecommendationEngine,
};

pub mod products;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub engine: RecommendationEngine,
    /// Largest `limit` a client may ask for
    pub max_limit: usize,
}

impl AppState {
    pub fn new(engine: RecommendationEngine, max_limit: usize) -> Self {
        Self { engine, max_limit }
    }

    /// Resolves a requested limit against the default and the configured cap
    pub fn resolve_limit(&self, requested: Option<usize>, default: usize) -> AppResult<usize> {
        let limit = requested.unwrap_or(default);
        if limit > self.max_limit {
            return Err(AppError::InvalidInput(format!(
                "limit must be at most {}",
                self.max_limit
            )));
        }
        Ok(limit)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route("/products/:product_id/similar", get(products::similar))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
