/// A macro to simplify caching logic around the response cache.
///
/// If the key holds a live value of the given variant, it is returned.
/// Otherwise the block is awaited, its value is wrapped in an `Arc`,
/// stored under the key with the given TTL (seconds), and returned.
/// Errors from the block propagate and nothing is stored.
///
/// # Arguments
/// * `$cache`: the [`ResponseCache`](crate::cache::ResponseCache) to use.
/// * `$key`: the [`CacheKey`](crate::cache::CacheKey) for the value.
/// * `$ttl`: time-to-live in seconds.
/// * `$variant`: the [`CachedValue`](crate::cache::CachedValue) variant holding the value.
/// * `$block`: future computing the value on a miss.
///
/// # Example
/// ```rust,ignore
/// let results = cached!(self.cache, key, ttl, CachedValue::Search, async move {
///     fetch_results().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $variant:path, $block:expr) => {{
        match $cache.get(&$key) {
            Some($variant(hit)) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(hit)
            }
            _ => {
                tracing::debug!(key = %$key, "Cache miss");
                match $block.await {
                    Ok(value) => {
                        let value = std::sync::Arc::new(value);
                        $cache.insert(&$key, $variant(value.clone()), $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
