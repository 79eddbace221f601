#![allow(dead_code)]

use std::sync::Arc;

use marketplace_recs::{
    db::{FakeStore, MemoryCache},
    models::Product,
    services::{EngineSettings, RecommendationEngine},
};
use uuid::Uuid;

pub fn product(category_id: i64, views: i32, rating: f64, reviews: i32) -> Product {
    let id = Uuid::new_v4();
    Product {
        id,
        name: format!("Product {}", id),
        slug: format!("product-{}", id),
        category_id,
        price: 19.99,
        stock: 5,
        is_active: true,
        avg_rating: rating,
        reviews_count: reviews,
        views_count: views,
    }
}

pub fn engine(store: Arc<FakeStore>) -> RecommendationEngine {
    RecommendationEngine::new(
        store,
        Arc::new(MemoryCache::new(1_000)),
        EngineSettings::default(),
    )
}

/// A small storefront: three categories, a handful of shoppers with
/// overlapping baskets, and browsing history for user 1.
pub struct Storefront {
    pub store: Arc<FakeStore>,
    pub products: Vec<Product>,
}

pub fn storefront() -> Storefront {
    let store = Arc::new(FakeStore::new());
    let mut products = Vec::new();
    for category in 1..=3 {
        for i in 0..8 {
            let mut p = product(category, 100 * category as i32 + i, 3.0 + i as f64 * 0.2, i);
            if i == 7 {
                p.stock = 0;
            }
            store.insert_product(p.clone());
            products.push(p);
        }
    }

    store.add_order(1, &[products[0].id, products[1].id]);
    store.add_order(2, &[products[0].id, products[1].id, products[8].id, products[9].id]);
    store.add_order(3, &[products[1].id, products[9].id, products[16].id]);
    store.add_order(4, &[products[2].id, products[17].id]);
    store.add_view(1, products[3].id);
    store.add_view(1, products[10].id);

    Storefront { store, products }
}
