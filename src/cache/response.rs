use {
    bytes::*,
    duration_str::*,
    http::{header::*, response::*, *},
    kutil::http::*,
    std::{sync::*, time::*},
    tokio::time::Instant,
};

/// Common reference type for [CachedResponse].
pub type CachedResponseRef = Arc<CachedResponse>;

//
// CachedResponse
//

/// Cached HTTP response.
///
/// An immutable snapshot of a successful response. It is never modified in place: a later
/// successful fetch of the same key replaces it with a new snapshot.
#[derive(Clone, Debug)]
pub struct CachedResponse {
    /// Response parts.
    pub parts: Parts,

    /// Response body.
    pub body: Bytes,

    /// When the snapshot was captured.
    pub stored_at: Instant,
}

impl CachedResponse {
    /// Constructor.
    ///
    /// Removes the `XX-Cache` and `Content-Length` headers. The latter is restored from the
    /// body in [to_response](Self::to_response).
    pub fn new(mut parts: Parts, body: Bytes) -> Self {
        parts.headers.remove(XX_CACHE);
        parts.headers.remove(CONTENT_LENGTH);

        Self {
            parts,
            body,
            stored_at: Instant::now(),
        }
    }

    /// Snapshot of a buffered response.
    pub fn new_for(response: &Response<Bytes>) -> Self {
        let (parts, body) = response.clone().into_parts();
        Self::new(parts, body)
    }

    /// Status.
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    /// Headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Time since the snapshot was captured.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Create a [Response].
    ///
    /// Cloning the body is cheap.
    pub fn to_response(&self) -> Response<Bytes> {
        let mut parts = self.parts.clone();
        parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));

        tracing::debug!("serving snapshot of age {}", self.age().human_format());

        Response::from_parts(parts, self.body.clone())
    }
}
