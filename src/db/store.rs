use crate::{
    error::AppResult,
    models::{BuyerOverlap, Product, ProductId, ProductQuery, Purchase, UserId},
};

/// Read-only access to the catalog, order and view tables
///
/// Every method is a single round trip against the backing store. The
/// recommendation strategies compose these; none of them mutate anything.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch a single product regardless of its active flag or stock
    async fn product(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// Fetch products by id regardless of active flag or stock, in no particular order
    async fn products_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>>;

    /// Active products matching the query, sorted and capped by the store
    async fn find_products(&self, query: &ProductQuery) -> AppResult<Vec<Product>>;

    /// Distinct products the user has on any order
    async fn purchased_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>>;

    /// Distinct products the user has viewed while signed in
    async fn viewed_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>>;

    /// Other users who bought at least one of `product_ids`, with the number
    /// of distinct products they share, highest overlap first, at most `limit`
    async fn overlapping_buyers(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
        limit: usize,
    ) -> AppResult<Vec<BuyerOverlap>>;

    /// Distinct (user, product) purchase pairs for the given users
    async fn purchases_by_users(&self, user_ids: &[UserId]) -> AppResult<Vec<Purchase>>;
}
