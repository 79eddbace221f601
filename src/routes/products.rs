use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::Product,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub limit: Option<usize>,
}

/// Handler for the similar-products endpoint
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(product_id): Path<Uuid>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let limit = state.resolve_limit(params.limit, state.engine.settings().similar_limit)?;

    let product = state
        .engine
        .store()
        .product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", product_id)))?;

    let products = state.engine.similar_products(&product, limit).await?;

    tracing::info!(
        request_id = %request_id,
        product_id = %product_id,
        count = products.len(),
        "Similar products served"
    );

    Ok(Json(products))
}
