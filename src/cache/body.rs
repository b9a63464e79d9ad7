use {
    bytes::*,
    http_body::*,
    std::{pin::*, task::*},
    tower::BoxError,
};

//
// OfflineBody
//

/// HTTP response body served by the offline layer.
///
/// Either a buffered body (from the network, the cache, or a synthesized fallback) or the
/// upstream body passed through as is (for bypassed requests).
#[derive(Debug)]
pub enum OfflineBody<BodyT> {
    /// Buffered body.
    ///
    /// Becomes [None] after it has been polled.
    Full(Option<Bytes>),

    /// Upstream body.
    Upstream(BodyT),
}

impl<BodyT> OfflineBody<BodyT> {
    /// Buffered body.
    pub fn full(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::Full(None)
        } else {
            Self::Full(Some(bytes))
        }
    }

    /// Upstream body.
    pub fn upstream(body: BodyT) -> Self {
        Self::Upstream(body)
    }
}

impl<BodyT> From<Bytes> for OfflineBody<BodyT> {
    fn from(bytes: Bytes) -> Self {
        Self::full(bytes)
    }
}

impl<BodyT> Body for OfflineBody<BodyT>
where
    BodyT: Body<Data = Bytes> + Unpin,
    BodyT::Error: Into<BoxError>,
{
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        context: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Full(bytes) => Poll::Ready(bytes.take().map(|bytes| Ok(Frame::data(bytes)))),
            Self::Upstream(body) => Pin::new(body).poll_frame(context).map_err(Into::into),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Full(bytes) => bytes.is_none(),
            Self::Upstream(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            Self::Full(bytes) => {
                SizeHint::with_exact(bytes.as_ref().map(|bytes| bytes.len() as u64).unwrap_or_default())
            }
            Self::Upstream(body) => body.size_hint(),
        }
    }
}
