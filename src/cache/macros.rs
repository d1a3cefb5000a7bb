/// Wraps a fallible async computation with an optional Redis cache lookup.
///
/// `$cache` is an `Option<Cache>`. With no cache the block simply runs. With
/// one, a hit is returned directly; a miss runs the block and queues the
/// result for a background write. Cache read failures are logged and treated
/// as misses, so Redis being unavailable never fails the caller.
///
/// # Arguments
/// * `$cache`: `Option<Cache>` to consult.
/// * `$key`: the `CacheKey` for the value.
/// * `$ttl`: time-to-live in seconds for newly written values.
/// * `$block`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let poster: Option<String> = cached!(self.cache, CacheKey::Poster(title.to_string()), ttl, async move {
///     self.search_poster(title).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match &$cache {
            None => $block.await,
            Some(cache) => {
                let key = $key;
                let hit = match cache.get_from_cache(&key).await {
                    Ok(hit) => hit,
                    Err(e) => {
                        tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                        None
                    }
                };

                match hit {
                    Some(cached) => Ok(cached),
                    None => {
                        let result = $block.await;
                        if let Ok(value) = &result {
                            cache.set_in_background(&key, value, $ttl);
                        }
                        result
                    }
                }
            }
        }
    }};
}
