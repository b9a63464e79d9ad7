use super::super::super::{bounds::*, cache::*, key::*, response::*};

use {
    kutil::std::collections::*,
    std::{collections::*, sync::*},
    tokio::sync::RwLock,
};

//
// MemoryCache
//

/// In-memory [Cache] with first-in-first-out eviction.
///
/// When [max_entries](CacheBounds::max_entries) is exceeded the entry that was inserted first is
/// evicted. Overwriting an entry counts as a new insertion. Expiration by
/// [max_age](CacheBounds::max_age) is lazy: it happens when the entry is read.
#[derive(Debug)]
pub struct MemoryCache<CacheKeyT = RequestCacheKey> {
    bounds: CacheBounds,
    state: Arc<RwLock<MemoryCacheState<CacheKeyT>>>,
}

impl<CacheKeyT> MemoryCache<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    /// Constructor.
    pub fn new(bounds: CacheBounds) -> Self {
        Self {
            bounds,
            state: Arc::new(RwLock::new(MemoryCacheState::default())),
        }
    }

    /// Bounds.
    pub fn bounds(&self) -> &CacheBounds {
        &self.bounds
    }
}

impl<CacheKeyT> Cache<CacheKeyT> for MemoryCache<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    async fn get(&self, key: &CacheKeyT) -> Option<CachedResponseRef> {
        let expired_sequence = {
            let state = self.state.read().await;
            let (sequence, cached_response) = state.entries.get(key)?;
            if !self.bounds.is_expired(cached_response.age()) {
                return Some(cached_response.clone());
            }
            *sequence
        };

        // Another writer might have replaced it in the meantime
        self.state.write().await.remove_if(key, expired_sequence);
        None
    }

    async fn put(&self, key: CacheKeyT, cached_response: CachedResponseRef) {
        let mut state = self.state.write().await;

        state.remove(&key);
        state.insert(key, cached_response);

        if let Some(max_entries) = self.bounds.max_entries {
            while state.entries.len() > max_entries {
                match state.evict_oldest() {
                    Some(key) => tracing::debug!("evict (FIFO): {}", key),
                    None => break,
                }
            }
        }
    }

    async fn invalidate(&self, key: &CacheKeyT) {
        self.state.write().await.remove(key);
    }

    async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.order.clear();
    }

    async fn keys(&self) -> Vec<CacheKeyT> {
        let state = self.state.read().await;
        state
            .order
            .values()
            .filter(|key| {
                state
                    .entries
                    .get(*key)
                    .map(|(_, cached_response)| !self.bounds.is_expired(cached_response.age()))
                    .unwrap_or_default()
            })
            .cloned()
            .collect()
    }
}

impl<CacheKeyT> Clone for MemoryCache<CacheKeyT> {
    fn clone(&self) -> Self {
        Self {
            bounds: self.bounds,
            state: self.state.clone(),
        }
    }
}

//
// MemoryCacheState
//

#[derive(Debug)]
struct MemoryCacheState<CacheKeyT> {
    entries: FastHashMap<CacheKeyT, (u64, CachedResponseRef)>,

    // Insertion sequence -> key
    order: BTreeMap<u64, CacheKeyT>,

    next_sequence: u64,
}

impl<CacheKeyT> MemoryCacheState<CacheKeyT>
where
    CacheKeyT: CacheKey,
{
    fn insert(&mut self, key: CacheKeyT, cached_response: CachedResponseRef) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.order.insert(sequence, key.clone());
        self.entries.insert(key, (sequence, cached_response));
    }

    fn remove(&mut self, key: &CacheKeyT) {
        if let Some((sequence, _)) = self.entries.remove(key) {
            self.order.remove(&sequence);
        }
    }

    fn remove_if(&mut self, key: &CacheKeyT, sequence: u64) {
        if self.entries.get(key).map(|(current, _)| *current == sequence).unwrap_or_default() {
            self.remove(key);
        }
    }

    fn evict_oldest(&mut self) -> Option<CacheKeyT> {
        let (_, key) = self.order.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

impl<CacheKeyT> Default for MemoryCacheState<CacheKeyT> {
    fn default() -> Self {
        Self {
            entries: FastHashMap::default(),
            order: BTreeMap::default(),
            next_sequence: 0,
        }
    }
}
