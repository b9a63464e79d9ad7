use {
    bytes::*,
    http::{header::*, *},
};

/// Body of the synthesized offline response.
pub const OFFLINE_TEXT: &str = "Offline";

//
// ResponseSource
//

/// Response extension telling where a served response came from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ResponseSource {
    /// Fresh from the network.
    Network,

    /// From a cache.
    Cache,

    /// Offline fallback (offline page or synthesized 503).
    Fallback,

    /// Passed through without caching.
    Bypass,
}

/// Synthesized offline response for requests that could be served neither by the network nor by
/// a cache.
///
/// It's a well-formed 503 (Service Unavailable) with a plain-text body so that the requesting page
/// can handle it like any other failed response.
pub fn service_unavailable_response() -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(OFFLINE_TEXT.as_bytes()));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(OFFLINE_TEXT.len()));

    response
}

//
// WithResponseSource
//

/// Attach a [ResponseSource].
pub trait WithResponseSource {
    /// Attach a [ResponseSource].
    fn with_source(self, source: ResponseSource) -> Self;

    /// The attached [ResponseSource].
    fn source(&self) -> Option<ResponseSource>;
}

impl<BodyT> WithResponseSource for Response<BodyT> {
    fn with_source(mut self, source: ResponseSource) -> Self {
        self.extensions_mut().insert(source);
        self
    }

    fn source(&self) -> Option<ResponseSource> {
        self.extensions().get::<ResponseSource>().copied()
    }
}
