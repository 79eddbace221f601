use std::collections::{BTreeSet, HashSet};

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{CategoryId, Product, ProductId, ProductOrder, ProductQuery, UserId},
};

use super::popularity;

/// Best-rated unseen products from the categories a user has engaged with
///
/// Categories come from every product the user viewed or bought. Products
/// the user already viewed or bought are never returned. Without any engaged
/// category the popularity ranking is returned instead.
pub async fn recommend(
    store: &dyn CatalogStore,
    user_id: UserId,
    limit: usize,
    exclude: Option<ProductId>,
) -> AppResult<Vec<Product>> {
    let viewed = store.viewed_product_ids(user_id).await?;
    let purchased = store.purchased_product_ids(user_id).await?;
    let engaged: HashSet<ProductId> = viewed.into_iter().chain(purchased).collect();

    let categories = engaged_categories(store, &engaged).await?;
    if categories.is_empty() {
        tracing::debug!(user_id, "No engaged categories, using popularity");
        return popularity::recommend(store, limit, exclude).await;
    }

    let query = ProductQuery::recommendable(ProductOrder::Rating, limit)
        .in_categories(categories.into_iter().collect())
        .excluding(engaged)
        .excluding(exclude);
    let products = store.find_products(&query).await?;

    tracing::debug!(user_id, count = products.len(), "Content-based recommendations");
    Ok(products)
}

async fn engaged_categories(
    store: &dyn CatalogStore,
    engaged: &HashSet<ProductId>,
) -> AppResult<BTreeSet<CategoryId>> {
    if engaged.is_empty() {
        return Ok(BTreeSet::new());
    }
    let ids: Vec<ProductId> = engaged.iter().copied().collect();
    let products = store.products_by_ids(&ids).await?;
    Ok(products.iter().map(|p| p.category_id).collect())
}
