use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use uuid::Uuid;

use crate::{
    db::store::CatalogStore,
    error::AppResult,
    models::{
        BuyerOverlap, Order, Product, ProductId, ProductQuery, ProductView, Purchase, UserId,
    },
};

#[derive(Default)]
struct FakeData {
    products: HashMap<ProductId, Product>,
    orders: Vec<Order>,
    views: Vec<ProductView>,
}

/// In-memory [`CatalogStore`] for tests and local runs
///
/// Mirrors the Postgres store's semantics and counts every query so tests can
/// assert when the cache short-circuits the store.
#[derive(Default)]
pub struct FakeStore {
    data: RwLock<FakeData>,
    query_calls: AtomicU64,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product: Product) {
        self.write().products.insert(product.id, product);
    }

    /// Records an order for `user_id` containing `product_ids`
    pub fn add_order(&self, user_id: UserId, product_ids: &[ProductId]) {
        self.write().orders.push(Order {
            id: Uuid::new_v4(),
            user_id,
            product_ids: product_ids.to_vec(),
        });
    }

    pub fn add_view(&self, user_id: UserId, product_id: ProductId) {
        self.write().views.push(ProductView {
            product_id,
            user_id: Some(user_id),
            session_key: None,
        });
    }

    pub fn add_anonymous_view(&self, session_key: &str, product_id: ProductId) {
        self.write().views.push(ProductView {
            product_id,
            user_id: None,
            session_key: Some(session_key.to_string()),
        });
    }

    pub fn query_count(&self) -> u64 {
        self.query_calls.load(Ordering::SeqCst)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FakeData> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FakeData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn distinct_products_of(data: &FakeData, user_id: UserId) -> BTreeSet<ProductId> {
    data.orders
        .iter()
        .filter(|o| o.user_id == user_id)
        .flat_map(|o| o.product_ids.iter().copied())
        .collect()
}

#[async_trait::async_trait]
impl CatalogStore for FakeStore {
    async fn product(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.read().products.get(&id).cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> AppResult<Vec<Product>> {
        let data = self.read();
        let unique: BTreeSet<&ProductId> = ids.iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| data.products.get(id).cloned())
            .collect())
    }

    async fn find_products(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let data = self.read();
        let mut products: Vec<Product> = data
            .products
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| query.order.compare(a, b));
        products.truncate(query.limit);
        Ok(products)
    }

    async fn purchased_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>> {
        let data = self.read();
        Ok(distinct_products_of(&data, user_id).into_iter().collect())
    }

    async fn viewed_product_ids(&self, user_id: UserId) -> AppResult<Vec<ProductId>> {
        let data = self.read();
        let viewed: BTreeSet<ProductId> = data
            .views
            .iter()
            .filter(|v| v.user_id == Some(user_id))
            .map(|v| v.product_id)
            .collect();
        Ok(viewed.into_iter().collect())
    }

    async fn overlapping_buyers(
        &self,
        user_id: UserId,
        product_ids: &[ProductId],
        limit: usize,
    ) -> AppResult<Vec<BuyerOverlap>> {
        let data = self.read();
        let wanted: BTreeSet<&ProductId> = product_ids.iter().collect();

        let mut shared: BTreeMap<UserId, BTreeSet<ProductId>> = BTreeMap::new();
        for order in data.orders.iter().filter(|o| o.user_id != user_id) {
            for product_id in order.product_ids.iter().filter(|id| wanted.contains(id)) {
                shared.entry(order.user_id).or_default().insert(*product_id);
            }
        }

        let mut overlaps: Vec<BuyerOverlap> = shared
            .into_iter()
            .map(|(user_id, products)| BuyerOverlap {
                user_id,
                overlap: products.len() as i64,
            })
            .collect();
        // Stable sort keeps ascending user id among equal overlaps
        overlaps.sort_by(|a, b| b.overlap.cmp(&a.overlap));
        overlaps.truncate(limit);
        Ok(overlaps)
    }

    async fn purchases_by_users(&self, user_ids: &[UserId]) -> AppResult<Vec<Purchase>> {
        let data = self.read();
        let pairs: BTreeSet<(UserId, ProductId)> = data
            .orders
            .iter()
            .filter(|o| user_ids.contains(&o.user_id))
            .flat_map(|o| o.product_ids.iter().map(move |p| (o.user_id, *p)))
            .collect();
        Ok(pairs
            .into_iter()
            .map(|(user_id, product_id)| Purchase {
                user_id,
                product_id,
            })
            .collect())
    }
}
