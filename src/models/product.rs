use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

pub type ProductId = Uuid;
pub type CategoryId = i64;

/// A catalog product as read by the recommendation engine
///
/// The catalog owns the lifecycle of these rows; the engine only reads them
/// and hands them back to page rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub price: f64,
    pub stock: i32,
    pub is_active: bool,
    pub avg_rating: f64,
    pub reviews_count: i32,
    pub views_count: i32,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the product may appear in personalized or popularity results
    pub fn is_recommendable(&self) -> bool {
        self.is_active && self.in_stock()
    }
}

/// Sort orders the engine asks the store for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrder {
    /// views desc, rating desc, reviews desc
    Popularity,
    /// rating desc, reviews desc
    Rating,
}

impl ProductOrder {
    /// Compares two products under this order. Ties fall back to product id
    /// so in-memory ranking is deterministic.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            ProductOrder::Popularity => b
                .views_count
                .cmp(&a.views_count)
                .then_with(|| b.avg_rating.total_cmp(&a.avg_rating))
                .then_with(|| b.reviews_count.cmp(&a.reviews_count)),
            ProductOrder::Rating => b
                .avg_rating
                .total_cmp(&a.avg_rating)
                .then_with(|| b.reviews_count.cmp(&a.reviews_count)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Filter for active products, evaluated by a [`crate::db::CatalogStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Restrict to these categories; `None` means any category
    pub categories: Option<Vec<CategoryId>>,
    pub exclude: Vec<ProductId>,
    pub in_stock_only: bool,
    pub order: ProductOrder,
    pub limit: usize,
}

impl ProductQuery {
    /// Active, in-stock products in the given order
    pub fn recommendable(order: ProductOrder, limit: usize) -> Self {
        Self {
            categories: None,
            exclude: Vec::new(),
            in_stock_only: true,
            order,
            limit,
        }
    }

    pub fn in_categories(mut self, categories: Vec<CategoryId>) -> Self {
        self.categories = Some(categories);
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ProductId>) -> Self {
        self.exclude.extend(ids);
        self
    }

    /// Whether a product passes every filter of this query (ignores order and limit)
    pub fn matches(&self, product: &Product) -> bool {
        if !product.is_active {
            return false;
        }
        if self.in_stock_only && !product.in_stock() {
            return false;
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&product.category_id) {
                return false;
            }
        }
        !self.exclude.contains(&product.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(views: i32, rating: f64, reviews: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Kettle".to_string(),
            slug: "kettle".to_string(),
            category_id: 1,
            price: 49.9,
            stock: 3,
            is_active: true,
            avg_rating: rating,
            reviews_count: reviews,
            views_count: views,
        }
    }

    #[test]
    fn test_recommendable_requires_active_and_stock() {
        let mut p = product(0, 0.0, 0);
        assert!(p.is_recommendable());

        p.stock = 0;
        assert!(!p.is_recommendable());

        p.stock = 1;
        p.is_active = false;
        assert!(!p.is_recommendable());
    }

    #[test]
    fn test_popularity_order_views_first() {
        let busy = product(100, 1.0, 0);
        let rated = product(10, 5.0, 50);
        assert_eq!(ProductOrder::Popularity.compare(&busy, &rated), Ordering::Less);
    }

    #[test]
    fn test_popularity_order_breaks_view_ties_by_rating_then_reviews() {
        let a = product(10, 4.5, 1);
        let b = product(10, 4.0, 99);
        let c = product(10, 4.5, 7);
        let mut products = vec![a.clone(), b.clone(), c.clone()];
        products.sort_by(|x, y| ProductOrder::Popularity.compare(x, y));
        assert_eq!(products, vec![c, a, b]);
    }

    #[test]
    fn test_rating_order_ignores_views() {
        let busy = product(1000, 3.0, 10);
        let rated = product(1, 4.8, 2);
        assert_eq!(ProductOrder::Rating.compare(&rated, &busy), Ordering::Less);
    }

    #[test]
    fn test_query_matches_filters() {
        let p = product(0, 0.0, 0);
        let query = ProductQuery::recommendable(ProductOrder::Rating, 5).in_categories(vec![1]);
        assert!(query.matches(&p));

        let query = query.excluding([p.id]);
        assert!(!query.matches(&p));

        let other_category =
            ProductQuery::recommendable(ProductOrder::Rating, 5).in_categories(vec![2]);
        assert!(!other_category.matches(&p));
    }

    #[test]
    fn test_query_without_stock_filter_keeps_sold_out_products() {
        let mut p = product(0, 0.0, 0);
        p.stock = 0;
        let mut query = ProductQuery::recommendable(ProductOrder::Rating, 5);
        assert!(!query.matches(&p));
        query.in_stock_only = false;
        assert!(query.matches(&p));
    }
}
