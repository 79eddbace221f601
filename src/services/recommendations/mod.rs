//! Product recommendations
//!
//! Blends three strategies behind a TTL cache:
//! - collaborative filtering over co-purchases (signed-in users),
//! - content-based filtering over viewed/bought categories (tops up thin
//!   collaborative results),
//! - popularity (anonymous visitors, or anyone without history).

pub mod collaborative;
pub mod content;
pub mod popularity;

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    cached,
    config::Config,
    db::{CacheKey, CatalogStore, RecommendationCache},
    error::AppResult,
    models::{Product, ProductId, ProductOrder, ProductQuery, Subject},
};

/// Tuning knobs for [`RecommendationEngine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Seconds a blended recommendation list stays cached
    pub recommendations_ttl: u64,
    /// Seconds a similar-products list stays cached
    pub similar_ttl: u64,
    /// Overlapping buyers considered by collaborative filtering
    pub neighbor_limit: usize,
    /// Content-based results are merged in when collaborative yields fewer
    /// than `limit / fallback_divisor` products
    pub fallback_divisor: usize,
    pub default_limit: usize,
    pub similar_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            recommendations_ttl: 300,
            similar_ttl: 600,
            neighbor_limit: 20,
            fallback_divisor: 2,
            default_limit: 8,
            similar_limit: 6,
        }
    }
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            recommendations_ttl: config.recommendations_ttl_secs,
            similar_ttl: config.similar_ttl_secs,
            neighbor_limit: config.neighbor_limit,
            fallback_divisor: config.fallback_divisor,
            default_limit: config.default_limit,
            similar_limit: config.similar_limit,
        }
    }
}

impl EngineSettings {
    /// Below this many collaborative results the content-based strategy tops up.
    /// Exactly at the threshold no top-up happens.
    pub fn fallback_threshold(&self, limit: usize) -> usize {
        limit / self.fallback_divisor.max(1)
    }
}

/// Chooses, blends and caches recommendation strategies
#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn CatalogStore>,
    cache: Arc<dyn RecommendationCache>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<dyn RecommendationCache>,
        settings: EngineSettings,
    ) -> Self {
        tracing::info!(
            cache = cache.name(),
            neighbor_limit = settings.neighbor_limit,
            fallback_divisor = settings.fallback_divisor,
            "Recommendation engine ready"
        );
        Self {
            store,
            cache,
            settings,
        }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Up to `limit` products for `subject`, never including `exclude`
    ///
    /// Results are cached per (subject, exclude, limit) for
    /// `recommendations_ttl` seconds.
    #[tracing::instrument(skip(self))]
    pub async fn recommend(
        &self,
        subject: Subject,
        limit: usize,
        exclude: Option<ProductId>,
    ) -> AppResult<Vec<Product>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let key = CacheKey::Recommendations {
            subject,
            exclude,
            limit,
        };
        let products = cached!(self.cache, key, self.settings.recommendations_ttl, async {
            self.compute(subject, limit, exclude).await
        });
        Ok(products)
    }

    async fn compute(
        &self,
        subject: Subject,
        limit: usize,
        exclude: Option<ProductId>,
    ) -> AppResult<Vec<Product>> {
        let store = self.store.as_ref();

        let Subject::User(user_id) = subject else {
            return popularity::recommend(store, limit, exclude).await;
        };

        let mut products = collaborative::recommend(
            store,
            user_id,
            limit,
            exclude,
            self.settings.neighbor_limit,
        )
        .await?;

        let threshold = self.settings.fallback_threshold(limit);
        if products.is_empty() || products.len() < threshold {
            let collaborative_count = products.len();
            let content = content::recommend(store, user_id, limit, exclude).await?;
            merge_unique(&mut products, content, limit);
            tracing::info!(
                user_id,
                collaborative = collaborative_count,
                threshold,
                total = products.len(),
                "Topped up with content-based recommendations"
            );
        } else {
            tracing::info!(user_id, total = products.len(), "Collaborative recommendations");
        }

        Ok(products)
    }

    /// Other active products in the same category as `product`, best rated first
    ///
    /// Cached per (product, limit) for `similar_ttl` seconds; independent of who asks.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn similar_products(&self, product: &Product, limit: usize) -> AppResult<Vec<Product>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let key = CacheKey::SimilarProducts {
            product_id: product.id,
            limit,
        };
        let products = cached!(self.cache, key, self.settings.similar_ttl, async {
            let mut query = ProductQuery::recommendable(ProductOrder::Rating, limit)
                .in_categories(vec![product.category_id])
                .excluding([product.id]);
            // Sold-out neighbours still show on the product page
            query.in_stock_only = false;
            self.store.find_products(&query).await
        });
        Ok(products)
    }
}

/// Appends products from `extra` whose ids are not yet in `products`,
/// stopping once `products` holds `limit` entries
fn merge_unique(products: &mut Vec<Product>, extra: Vec<Product>, limit: usize) {
    let mut seen: HashSet<ProductId> = products.iter().map(|p| p.id).collect();
    for product in extra {
        if products.len() >= limit {
            break;
        }
        if seen.insert(product.id) {
            products.push(product);
        }
    }
}
