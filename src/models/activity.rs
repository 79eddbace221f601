use uuid::Uuid;

use super::{ProductId, UserId};

/// A completed order with the products on its line items
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: UserId,
    pub product_ids: Vec<ProductId>,
}

/// A recorded visit to a product page
///
/// Anonymous visits carry only a session key and never feed recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub product_id: ProductId,
    pub user_id: Option<UserId>,
    pub session_key: Option<String>,
}

/// One (user, product) purchase pair, deduplicated across orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct Purchase {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// Another user and how many distinct products they share with the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct BuyerOverlap {
    pub user_id: UserId,
    pub overlap: i64,
}
