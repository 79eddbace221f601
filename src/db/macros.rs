/// Serves a value from a [`RecommendationCache`](crate::db::RecommendationCache)
/// or computes and stores it.
///
/// A hit returns the cached list as is, including an empty one. A miss, or a
/// cache read that fails, evaluates `$block`, hands the result to the cache
/// for a background write, and returns it. Cache failures never reach the
/// caller; errors from `$block` are propagated with `?`.
///
/// # Arguments
/// * `$cache`: anything exposing `get(&CacheKey)` and `set(&CacheKey, &[Product], u64)`.
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: time-to-live for a freshly computed value, in seconds.
/// * `$block`: future producing `AppResult<Vec<Product>>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let products = cached!(self.cache, key, ttl, async {
///     popularity::recommend(store, limit, exclude).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get(&$key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %$key, "Cache hit");
                cached
            }
            lookup => {
                match lookup {
                    Err(e) => tracing::warn!(key = %$key, error = %e, "Cache read failed, recomputing"),
                    _ => tracing::debug!(key = %$key, "Cache miss"),
                }
                let value = $block.await?;
                $cache.set(&$key, &value, $ttl);
                value
            }
        }
    }};
}
