use {
    http::*,
    std::{fmt, hash::*},
};

//
// CacheKey
//

/// Cache key.
pub trait CacheKey
where
    Self: 'static + Clone + fmt::Debug + fmt::Display + Eq + Hash + Send + Sync,
{
    /// Create a cache key for a request.
    fn for_request(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self;
}
