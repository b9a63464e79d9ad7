use super::{
    super::super::{bounds::*, cache::*, key::*, response::*, storage::*},
    builder::*,
};

use {
    kutil::std::collections::*,
    std::{collections::*, sync::*},
    tokio::sync::Mutex,
};

/// [CacheStorage] with [MokaCache] caches.
pub type MokaCacheStorage<CacheKeyT = RequestCacheKey> = CacheDirectory<MokaCacheFactory, CacheKeyT>;

//
// MokaCache
//

/// [Cache] backed by Moka, with first-in-first-out eviction.
///
/// Moka stores the entries and reclaims expired ones in the background. The insertion order is
/// tracked here: when [max_entries](CacheBounds::max_entries) is exceeded the entry that was
/// inserted first is evicted. Overwriting an entry counts as a new insertion.
pub struct MokaCache<CacheKeyT = RequestCacheKey> {
    bounds: CacheBounds,
    cache: moka::future::Cache<CacheKeyT, CachedResponseRef>,
    order: Arc<Mutex<InsertionOrder<CacheKeyT>>>,
}

impl<CacheKeyT> MokaCache<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    /// Constructor.
    pub fn new(name: &str, bounds: CacheBounds) -> Self {
        let cache = moka::future::Cache::builder()
            .name(name)
            .for_cache_bounds(&bounds)
            .build();

        Self {
            bounds,
            cache,
            order: Default::default(),
        }
    }
}

impl<CacheKeyT> Cache<CacheKeyT> for MokaCache<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    async fn get(&self, key: &CacheKeyT) -> Option<CachedResponseRef> {
        // Moka's own clock reclaims the entry later
        self.cache
            .get(key)
            .await
            .filter(|cached_response| !self.bounds.is_expired(cached_response.age()))
    }

    async fn put(&self, key: CacheKeyT, cached_response: CachedResponseRef) {
        let mut order = self.order.lock().await;

        order.push(key.clone());
        self.cache.insert(key, cached_response).await;

        if let Some(max_entries) = self.bounds.max_entries {
            while order.len() > max_entries {
                match order.pop_oldest() {
                    Some(key) => {
                        tracing::debug!("evict (FIFO): {}", key);
                        self.cache.invalidate(&key).await;
                    }

                    None => break,
                }
            }
        }
    }

    async fn invalidate(&self, key: &CacheKeyT) {
        let mut order = self.order.lock().await;
        order.remove(key);
        self.cache.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        let mut order = self.order.lock().await;
        order.clear();
        self.cache.invalidate_all();
    }

    async fn keys(&self) -> Vec<CacheKeyT> {
        let order = self.order.lock().await;

        let mut keys = Vec::with_capacity(order.len());
        for key in order.keys.values() {
            if self.get(key).await.is_some() {
                keys.push(key.clone());
            }
        }
        keys
    }
}

impl<CacheKeyT> Clone for MokaCache<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    fn clone(&self) -> Self {
        Self {
            bounds: self.bounds,
            cache: self.cache.clone(),
            order: self.order.clone(),
        }
    }
}

//
// InsertionOrder
//

#[derive(Debug)]
struct InsertionOrder<CacheKeyT> {
    sequences: FastHashMap<CacheKeyT, u64>,

    // Insertion sequence -> key
    keys: BTreeMap<u64, CacheKeyT>,

    next_sequence: u64,
}

impl<CacheKeyT> InsertionOrder<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn push(&mut self, key: CacheKeyT) {
        self.remove(&key);

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.keys.insert(sequence, key.clone());
        self.sequences.insert(key, sequence);
    }

    fn remove(&mut self, key: &CacheKeyT) {
        if let Some(sequence) = self.sequences.remove(key) {
            self.keys.remove(&sequence);
        }
    }

    fn pop_oldest(&mut self) -> Option<CacheKeyT> {
        let (_, key) = self.keys.pop_first()?;
        self.sequences.remove(&key);
        Some(key)
    }

    fn clear(&mut self) {
        self.sequences.clear();
        self.keys.clear();
    }
}

impl<CacheKeyT> Default for InsertionOrder<CacheKeyT> {
    fn default() -> Self {
        Self {
            sequences: FastHashMap::default(),
            keys: BTreeMap::default(),
            next_sequence: 0,
        }
    }
}

//
// MokaCacheFactory
//

/// [CacheFactory] for [MokaCache].
#[derive(Clone, Copy, Debug, Default)]
pub struct MokaCacheFactory;

impl<CacheKeyT> CacheFactory<CacheKeyT> for MokaCacheFactory
where
    CacheKeyT: CacheKey,
{
    type Cache = MokaCache<CacheKeyT>;

    fn create(&self, name: &str, bounds: CacheBounds) -> Self::Cache {
        MokaCache::new(name, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use {bytes::*, http::*};

    fn key(path: &str) -> RequestCacheKey {
        RequestCacheKey::get(&path.parse().unwrap())
    }

    fn cached(body: &'static str) -> CachedResponseRef {
        let response = Response::new(Bytes::from_static(body.as_bytes()));
        Arc::new(CachedResponse::new_for(&response))
    }

    #[tokio::test]
    async fn put_and_get() {
        let storage: MokaCacheStorage = MokaCacheStorage::default();
        let cache = storage.open("api-cache").await;

        cache.put(key("/api/v1/projects/"), cached("[]")).await;

        assert_eq!(cache.get(&key("/api/v1/projects/")).await.unwrap().body.as_ref(), b"[]");
        assert_eq!(cache.keys().await, vec![key("/api/v1/projects/")]);

        assert!(storage.delete("api-cache").await);
        assert!(cache.get(&key("/api/v1/projects/")).await.is_none());
    }

    #[tokio::test]
    async fn fifo_eviction() {
        let storage: MokaCacheStorage = MokaCacheStorage::default();
        let cache = storage.open_with("api-cache", CacheBounds::new(Some(2), None)).await;

        for path in ["/1", "/2", "/3"] {
            cache.put(key(path), cached(path)).await;
        }

        assert_eq!(cache.keys().await, vec![key("/2"), key("/3")]);
        assert!(cache.get(&key("/1")).await.is_none());
        assert_eq!(cache.get(&key("/3")).await.unwrap().body.as_ref(), b"/3");

        // Overwriting moves to the back
        cache.put(key("/2"), cached("/2")).await;
        cache.put(key("/4"), cached("/4")).await;
        assert_eq!(cache.keys().await, vec![key("/2"), key("/4")]);
        assert!(cache.get(&key("/3")).await.is_none());
    }
}
