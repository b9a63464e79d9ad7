use super::super::{super::super::error::*, configuration::*, hooks::*};

use {
    bytes::*,
    http::{header::*, *},
    http_body::Body,
    http_body_util::BodyExt,
    kutil::http::*,
    std::result::Result,
    tower::BoxError,
};

//
// OpaqueResponse
//

/// Response extension marking an opaque response.
///
/// An opaque response (a cross-origin response whose status is not inspectable) is cacheable
/// whatever its status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OpaqueResponse;

/// Read the whole upstream response body.
pub async fn read_response<BodyT>(response: Response<BodyT>) -> Result<Response<Bytes>, FetchError>
where
    BodyT: Body,
    BodyT::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();
    let bytes = body
        .collect()
        .await
        .map_err(|error| FetchError::Body(error.into()))?
        .to_bytes();
    Ok(Response::from_parts(parts, bytes))
}

//
// UpstreamResponse
//

/// Upstream response.
pub trait UpstreamResponse {
    /// Whether the response was marked as [OpaqueResponse].
    fn is_opaque(&self) -> bool;

    /// Check if we should skip the cache.
    ///
    /// Only a 200 (or opaque) response is cacheable. If the response passes all our checks then
    /// we turn to the hook to give it one last chance to skip the cache.
    fn should_skip_cache(&self, uri: &Uri, configuration: &CachingConfiguration) -> bool;
}

impl UpstreamResponse for Response<Bytes> {
    fn is_opaque(&self) -> bool {
        self.extensions().get::<OpaqueResponse>().is_some()
    }

    fn should_skip_cache(&self, uri: &Uri, configuration: &CachingConfiguration) -> bool {
        let headers = self.headers();
        let status = self.status();

        let skip_cache = if !headers.xx_cache(configuration.cacheable_by_default) {
            tracing::debug!("skip ({}=false)", XX_CACHE);
            true
        } else if status != StatusCode::OK && !self.is_opaque() {
            tracing::debug!("skip (status={})", status.as_u16());
            true
        } else if headers.contains_key(CONTENT_RANGE) {
            tracing::debug!("skip (range)");
            true
        } else if self.body().len() > configuration.max_body_size {
            tracing::debug!("skip (body too big)");
            true
        } else {
            false
        };

        if !skip_cache
            && let Some(cacheable) = &configuration.cacheable_by_response
            && !cacheable(CacheableHookContext::new(uri, status, headers))
        {
            tracing::debug!("skip (cacheable_by_response=false)");
            return true;
        }

        skip_cache
    }
}
