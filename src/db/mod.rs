pub mod cache;
pub mod fake;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

mod macros;

pub use cache::{CacheKey, RecommendationCache};
pub use fake::FakeStore;
pub use memory::MemoryCache;
pub use postgres::{create_pool, PgCatalogStore};
pub use self::redis::{create_redis_client, Cache};
pub use store::CatalogStore;
