use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{Product, ProductId, Subject},
};

/// Cache key for a ranked product list
///
/// Every key carries the requested limit; a list stored under one limit is
/// never served for another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Blended recommendations for a subject, optionally hiding one product
    Recommendations {
        subject: Subject,
        exclude: Option<ProductId>,
        limit: usize,
    },
    /// Same-category neighbours of a product
    SimilarProducts { product_id: ProductId, limit: usize },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recommendations {
                subject,
                exclude,
                limit,
            } => match exclude {
                Some(id) => write!(f, "recs_{}_{}_{}", subject, id, limit),
                None => write!(f, "recs_{}_none_{}", subject, limit),
            },
            CacheKey::SimilarProducts { product_id, limit } => {
                write!(f, "similar_{}_{}", product_id, limit)
            }
        }
    }
}

/// Key/value store with per-entry TTL holding ranked product lists
///
/// Injected into the recommendation engine so tests and single-node
/// deployments can swap Redis for an in-process map.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationCache: Send + Sync {
    /// Returns the cached list, `Ok(None)` on a miss. An empty list is a hit.
    async fn get(&self, key: &CacheKey) -> AppResult<Option<Vec<Product>>>;

    /// Stores a list for `ttl` seconds. Failures are logged, never returned.
    fn set(&self, key: &CacheKey, products: &[Product], ttl: u64);

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn recs(subject: Subject, exclude: Option<ProductId>, limit: usize) -> CacheKey {
        CacheKey::Recommendations {
            subject,
            exclude,
            limit,
        }
    }

    #[test]
    fn test_cache_key_display_anonymous() {
        let key = recs(Subject::Anonymous, None, 8);
        assert_eq!(format!("{}", key), "recs_anon_none_8");
    }

    #[test]
    fn test_cache_key_display_user_with_exclusion() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let key = recs(Subject::User(42), Some(id), 6);
        assert_eq!(
            format!("{}", key),
            "recs_u42_67e55044-10b1-426f-9247-bb680e5fe0c8_6"
        );
    }

    #[test]
    fn test_cache_key_display_similar() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let key = CacheKey::SimilarProducts {
            product_id: id,
            limit: 6,
        };
        assert_eq!(
            format!("{}", key),
            "similar_67e55044-10b1-426f-9247-bb680e5fe0c8_6"
        );
    }

    #[test]
    fn test_cache_keys_differ_by_subject_exclusion_and_limit() {
        let id = Uuid::new_v4();
        let anon = recs(Subject::Anonymous, Some(id), 8);
        let user = recs(Subject::User(1), Some(id), 8);
        let unexcluded = recs(Subject::User(1), None, 8);
        let shorter = recs(Subject::User(1), None, 1);
        assert_ne!(anon.to_string(), user.to_string());
        assert_ne!(user.to_string(), unexcluded.to_string());
        assert_ne!(unexcluded.to_string(), shorter.to_string());

        let similar_six = CacheKey::SimilarProducts {
            product_id: id,
            limit: 6,
        };
        let similar_one = CacheKey::SimilarProducts {
            product_id: id,
            limit: 1,
        };
        assert_ne!(similar_six.to_string(), similar_one.to_string());
    }
}
