use super::hooks::*;

use std::fmt;

//
// CachingConfiguration
//

/// Caching configuration.
#[derive(Clone)]
pub struct CachingConfiguration {
    /// Maximum body size.
    ///
    /// Larger responses are served but not cached.
    pub max_body_size: usize,

    /// Cacheable by default.
    ///
    /// Used when a response does not have an `XX-Cache` header.
    pub cacheable_by_default: bool,

    /// Cacheable by response (hook).
    pub cacheable_by_response: Option<CacheableHook>,
}

impl Default for CachingConfiguration {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1 MiB
            cacheable_by_default: true,
            cacheable_by_response: None,
        }
    }
}

impl fmt::Debug for CachingConfiguration {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("CachingConfiguration")
            .field("max_body_size", &self.max_body_size)
            .field("cacheable_by_default", &self.cacheable_by_default)
            .field("cacheable_by_response", &self.cacheable_by_response.is_some())
            .finish()
    }
}
