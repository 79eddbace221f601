use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Product, Subject, UserId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Signed-in user as asserted by the storefront; absent for anonymous visitors
    pub user_id: Option<UserId>,
    pub limit: Option<usize>,
    /// Product to leave out, usually the one on the current page
    pub exclude: Option<Uuid>,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let limit = state.resolve_limit(params.limit, state.engine.settings().default_limit)?;
    let subject = Subject::from(params.user_id);

    tracing::info!(
        request_id = %request_id,
        subject = %subject,
        limit,
        exclude = ?params.exclude,
        "Processing recommendation request"
    );

    let products = state.engine.recommend(subject, limit, params.exclude).await?;

    tracing::info!(
        request_id = %request_id,
        count = products.len(),
        "Recommendations served"
    );

    Ok(Json(products))
}
