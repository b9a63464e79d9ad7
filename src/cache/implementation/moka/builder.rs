use super::super::super::{bounds::*, key::*, response::*};

//
// ForCacheBounds
//

/// Apply [CacheBounds] to a Moka cache builder.
pub trait ForCacheBounds
where
    Self: Sized,
{
    /// Apply [CacheBounds].
    ///
    /// Only the maximum age is applied, as the time to live. Moka's capacity eviction admits by
    /// frequency, so the entry count is enforced by [MokaCache](super::MokaCache) instead.
    fn for_cache_bounds(self, bounds: &CacheBounds) -> Self;
}

impl<CacheKeyT> ForCacheBounds
    for moka::future::CacheBuilder<CacheKeyT, CachedResponseRef, moka::future::Cache<CacheKeyT, CachedResponseRef>>
where
    CacheKeyT: CacheKey,
{
    fn for_cache_bounds(self, bounds: &CacheBounds) -> Self {
        match bounds.max_age {
            Some(max_age) => self.time_to_live(max_age),
            None => self,
        }
    }
}
