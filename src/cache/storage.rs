use super::{bounds::*, cache::*, key::*, response::*};

use {
    std::{collections::*, sync::*},
    tokio::sync::RwLock,
};

//
// CacheFactory
//

/// Creates named [Cache] instances for a [CacheDirectory].
pub trait CacheFactory<CacheKeyT = RequestCacheKey>
where
    Self: 'static + Clone + Send + Sync,
    CacheKeyT: CacheKey,
{
    /// Cache type.
    type Cache: Cache<CacheKeyT>;

    /// Create an empty cache.
    fn create(&self, name: &str, bounds: CacheBounds) -> Self::Cache;
}

//
// CacheStorage
//

/// Storage of named caches.
///
/// Implementations should ensure that cloning is cheap and clones always refer to the same shared
/// state.
pub trait CacheStorage<CacheKeyT = RequestCacheKey>
where
    Self: 'static + Clone + Send + Sync,
    CacheKeyT: CacheKey,
{
    /// Cache type.
    type Cache: Cache<CacheKeyT>;

    /// Open a cache, creating it if it doesn't exist.
    ///
    /// The bounds only apply when the cache is created.
    fn open_with(&self, name: &str, bounds: CacheBounds) -> impl Future<Output = Self::Cache> + Send;

    /// Open an existing cache.
    fn existing(&self, name: &str) -> impl Future<Output = Option<Self::Cache>> + Send;

    /// Delete a cache and drop all its entries.
    ///
    /// Returns true if it existed.
    fn delete(&self, name: &str) -> impl Future<Output = bool> + Send;

    /// Names of all caches.
    fn names(&self) -> impl Future<Output = BTreeSet<String>> + Send;

    /// Open an unbounded cache, creating it if it doesn't exist.
    fn open(&self, name: &str) -> impl Future<Output = Self::Cache> + Send {
        self.open_with(name, CacheBounds::unbounded())
    }

    /// Whether a cache exists.
    fn has(&self, name: &str) -> impl Future<Output = bool> + Send {
        async move { self.existing(name).await.is_some() }
    }

    /// Search all caches, in name order.
    fn match_any(&self, key: &CacheKeyT) -> impl Future<Output = Option<CachedResponseRef>> + Send {
        async move {
            for name in self.names().await {
                if let Some(cache) = self.existing(&name).await
                    && let Some(cached_response) = cache.get(key).await
                {
                    tracing::debug!("found in {}: {}", name, key);
                    return Some(cached_response);
                }
            }
            None
        }
    }

    /// Delete all caches.
    ///
    /// Returns the deleted names.
    fn clear(&self) -> impl Future<Output = Vec<String>> + Send {
        async move {
            let mut deleted = Vec::default();
            for name in self.names().await {
                if self.delete(&name).await {
                    deleted.push(name);
                }
            }
            deleted
        }
    }
}

//
// CacheDirectory
//

/// [CacheStorage] that keeps its caches in a shared map, creating them with a [CacheFactory].
pub struct CacheDirectory<FactoryT, CacheKeyT = RequestCacheKey>
where
    FactoryT: CacheFactory<CacheKeyT>,
    CacheKeyT: CacheKey,
{
    factory: FactoryT,
    caches: Arc<RwLock<BTreeMap<String, FactoryT::Cache>>>,
}

impl<FactoryT, CacheKeyT> CacheDirectory<FactoryT, CacheKeyT>
where
    FactoryT: CacheFactory<CacheKeyT>,
    CacheKeyT: CacheKey,
{
    /// Constructor.
    pub fn new(factory: FactoryT) -> Self {
        Self {
            factory,
            caches: Default::default(),
        }
    }
}

impl<FactoryT, CacheKeyT> CacheStorage<CacheKeyT> for CacheDirectory<FactoryT, CacheKeyT>
where
    FactoryT: CacheFactory<CacheKeyT>,
    CacheKeyT: CacheKey,
{
    type Cache = FactoryT::Cache;

    async fn open_with(&self, name: &str, bounds: CacheBounds) -> Self::Cache {
        if let Some(cache) = self.caches.read().await.get(name) {
            return cache.clone();
        }

        self.caches
            .write()
            .await
            .entry(name.into())
            .or_insert_with(|| {
                tracing::debug!("creating cache: {}", name);
                self.factory.create(name, bounds)
            })
            .clone()
    }

    async fn existing(&self, name: &str) -> Option<Self::Cache> {
        self.caches.read().await.get(name).cloned()
    }

    async fn delete(&self, name: &str) -> bool {
        let removed = self.caches.write().await.remove(name);
        match removed {
            Some(cache) => {
                tracing::debug!("deleting cache: {}", name);
                // Clones may still be held by in-flight requests
                cache.invalidate_all().await;
                true
            }

            None => false,
        }
    }

    async fn names(&self) -> BTreeSet<String> {
        self.caches.read().await.keys().cloned().collect()
    }
}

impl<FactoryT, CacheKeyT> Clone for CacheDirectory<FactoryT, CacheKeyT>
where
    FactoryT: CacheFactory<CacheKeyT>,
    CacheKeyT: CacheKey,
{
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            caches: self.caches.clone(),
        }
    }
}

impl<FactoryT, CacheKeyT> Default for CacheDirectory<FactoryT, CacheKeyT>
where
    FactoryT: CacheFactory<CacheKeyT> + Default,
    CacheKeyT: CacheKey,
{
    fn default() -> Self {
        Self::new(Default::default())
    }
}
