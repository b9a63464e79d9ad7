use {http::*, std::sync::*};

/// Hook to check if a response is cacheable.
pub type CacheableHook = Arc<Box<dyn Fn(CacheableHookContext) -> bool + Send + Sync>>;

//
// CacheableHookContext
//

/// Context for [CacheableHook].
#[derive(Clone, Debug)]
pub struct CacheableHookContext<'this> {
    /// Request URI.
    pub uri: &'this Uri,

    /// Response status.
    pub status: StatusCode,

    /// Response headers.
    pub headers: &'this HeaderMap,
}

impl<'this> CacheableHookContext<'this> {
    /// Constructor.
    pub fn new(uri: &'this Uri, status: StatusCode, headers: &'this HeaderMap) -> Self {
        Self { uri, status, headers }
    }
}
