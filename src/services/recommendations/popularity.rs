use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Product, ProductId, ProductOrder, ProductQuery},
};

/// Most viewed active, in-stock products
///
/// The universal fallback: it needs no signal about the subject and returns
/// something whenever any eligible product exists.
pub async fn recommend(
    store: &dyn CatalogStore,
    limit: usize,
    exclude: Option<ProductId>,
) -> AppResult<Vec<Product>> {
    let query = ProductQuery::recommendable(ProductOrder::Popularity, limit).excluding(exclude);
    let products = store.find_products(&query).await?;

    tracing::debug!(count = products.len(), "Popularity recommendations");
    Ok(products)
}
