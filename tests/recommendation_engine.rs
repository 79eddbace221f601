mod common;

use std::collections::HashSet;
use std::sync::Arc;

use marketplace_recs::{
    db::FakeStore,
    models::{ProductId, Subject},
};

use common::{engine, product, storefront};

#[tokio::test]
async fn test_results_never_exceed_limit() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    for subject in [Subject::Anonymous, Subject::User(1), Subject::User(2), Subject::User(99)] {
        for limit in [1, 2, 3, 5, 8, 30] {
            let recs = engine.recommend(subject, limit, None).await.unwrap();
            assert!(recs.len() <= limit, "{subject} limit {limit} got {}", recs.len());
        }
    }
}

#[tokio::test]
async fn test_excluded_product_never_returned() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    for excluded in shop.products.iter().map(|p| p.id) {
        for subject in [Subject::Anonymous, Subject::User(1), Subject::User(3)] {
            let recs = engine.recommend(subject, 8, Some(excluded)).await.unwrap();
            assert!(recs.iter().all(|p| p.id != excluded));
        }
    }
}

#[tokio::test]
async fn test_blended_results_have_no_duplicates() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    for user in 1..=4 {
        let recs = engine.recommend(Subject::User(user), 8, None).await.unwrap();
        let unique: HashSet<ProductId> = recs.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), recs.len());
    }
}

#[tokio::test]
async fn test_personalized_results_skip_owned_products() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    let recs = engine.recommend(Subject::User(1), 8, None).await.unwrap();
    let owned = [shop.products[0].id, shop.products[1].id];
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|p| !owned.contains(&p.id)));
    assert!(recs.iter().all(|p| p.is_recommendable()));
}

#[tokio::test]
async fn test_collaborative_results_lead_the_list() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    // Users 2 and 3 share purchases with user 1; product 9 was bought by both
    let recs = engine.recommend(Subject::User(1), 8, None).await.unwrap();
    assert_eq!(recs[0].id, shop.products[9].id);
}

#[tokio::test]
async fn test_anonymous_and_unknown_users_get_popular_in_stock_products() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    let anonymous = engine.recommend(Subject::Anonymous, 5, None).await.unwrap();
    assert_eq!(anonymous.len(), 5);
    assert!(anonymous.iter().all(|p| p.is_active && p.stock > 0));
    let views: Vec<i32> = anonymous.iter().map(|p| p.views_count).collect();
    let mut sorted = views.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(views, sorted);

    // No history at all: content-based defers to popularity
    let stranger = engine.recommend(Subject::User(99), 5, None).await.unwrap();
    assert_eq!(
        stranger.iter().map(|p| p.id).collect::<Vec<_>>(),
        anonymous.iter().map(|p| p.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_repeat_request_does_not_query_store() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    let first = engine.recommend(Subject::User(1), 8, None).await.unwrap();
    let after_first = shop.store.query_count();
    let second = engine.recommend(Subject::User(1), 8, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(shop.store.query_count(), after_first);
}

#[tokio::test]
async fn test_new_activity_is_hidden_until_cache_expires() {
    let store = Arc::new(FakeStore::new());
    let engine = engine(store.clone());

    let before = engine.recommend(Subject::Anonymous, 8, None).await.unwrap();
    assert!(before.is_empty());

    store.insert_product(product(1, 10, 4.0, 1));
    let after = engine.recommend(Subject::Anonymous, 8, None).await.unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn test_similar_products_share_category_and_exclude_anchor() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    let anchor = &shop.products[12];
    let similar = engine.similar_products(anchor, 6).await.unwrap();
    assert_eq!(similar.len(), 6);
    assert!(similar.iter().all(|p| p.category_id == anchor.category_id));
    assert!(similar.iter().all(|p| p.id != anchor.id));
    // Sold-out products remain eligible here
    assert_eq!(similar[0].id, shop.products[15].id);
}

#[tokio::test]
async fn test_limits_are_cached_independently() {
    let shop = storefront();
    let engine = engine(shop.store.clone());

    let single = engine.recommend(Subject::Anonymous, 1, None).await.unwrap();
    let page = engine.recommend(Subject::Anonymous, 8, None).await.unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(page.len(), 8);

    let anchor = &shop.products[12];
    let single = engine.similar_products(anchor, 1).await.unwrap();
    let page = engine.similar_products(anchor, 6).await.unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(page.len(), 6);
}
