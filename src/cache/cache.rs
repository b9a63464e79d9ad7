use super::{key::*, response::*};

//
// Cache
//

/// A named cache store.
///
/// Implementations should ensure that cloning is cheap and clones always refer to the same shared
/// state.
#[allow(async_fn_in_trait)]
pub trait Cache<CacheKeyT = RequestCacheKey>
where
    Self: 'static + Clone + Send + Sync,
    CacheKeyT: CacheKey,
{
    /// Get an entry from the cache.
    ///
    /// A miss is [None]. Expired entries are misses.
    ///
    /// Note that this is an `async` function written in longer form in order to include the `Send`
    /// constraint. Implementations can simply use `async fn get`.
    fn get(&self, key: &CacheKeyT) -> impl Future<Output = Option<CachedResponseRef>> + Send;

    /// Put an entry in the cache.
    ///
    /// Overwrites any existing entry for the key (last writer wins).
    ///
    /// Note that this is an `async` function written in longer form in order to include the `Send`
    /// constraint. Implementations can simply use `async fn put`.
    fn put(&self, key: CacheKeyT, cached_response: CachedResponseRef) -> impl Future<Output = ()> + Send;

    /// Invalidate a cache entry.
    fn invalidate(&self, key: &CacheKeyT) -> impl Future<Output = ()> + Send;

    /// Invalidate all cache entries.
    fn invalidate_all(&self) -> impl Future<Output = ()> + Send;

    /// Keys of the live entries.
    fn keys(&self) -> impl Future<Output = Vec<CacheKeyT>> + Send;

    /// Number of live entries.
    fn entry_count(&self) -> impl Future<Output = usize> + Send {
        async { self.keys().await.len() }
    }
}
