/// Read-through caching.
///
/// Returns the cached value under `$key` when present. Otherwise awaits
/// `$block`, stores its value for `$ttl` seconds and returns it. Errors from
/// the cache read or from the block are propagated with `?`.
///
/// # Example
/// ```rust,ignore
/// let page: MoviePage = cached!(self.cache, CacheKey::Trending(fragment), self.ttl, async move {
///     self.get_json("/trending/movie/week", &[]).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
