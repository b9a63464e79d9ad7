use super::{
    super::super::{bounds::*, key::*, storage::*},
    cache::*,
};

/// [CacheStorage] with [MemoryCache] caches.
pub type MemoryCacheStorage<CacheKeyT = RequestCacheKey> = CacheDirectory<MemoryCacheFactory, CacheKeyT>;

//
// MemoryCacheFactory
//

/// [CacheFactory] for [MemoryCache].
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryCacheFactory;

impl<CacheKeyT> CacheFactory<CacheKeyT> for MemoryCacheFactory
where
    CacheKeyT: CacheKey,
{
    type Cache = MemoryCache<CacheKeyT>;

    fn create(&self, _name: &str, bounds: CacheBounds) -> Self::Cache {
        MemoryCache::new(bounds)
    }
}
