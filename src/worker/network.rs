use super::super::{cache::middleware::*, error::*};

use {
    bytes::*,
    http::*,
    http_body::Body,
    std::result::Result,
    tower::{BoxError, Service, ServiceExt},
};

//
// Network
//

/// The network behind the worker.
///
/// Implemented for every cloneable tower [Service] that answers [Request]s with [Response]s, so
/// the inner service of an [OfflineLayer](super::super::OfflineLayer) is a network.
pub trait Network<RequestBodyT>
where
    Self: 'static + Clone + Send + Sync,
{
    /// Response body.
    type ResponseBody: 'static + Body<Data = Bytes, Error: Into<BoxError>> + Send + Unpin;

    /// Error.
    type Error: 'static + Into<BoxError> + Send;

    /// Send a request upstream.
    ///
    /// Note that this is an `async` function written in longer form in order to include the `Send`
    /// constraint.
    fn call_upstream(
        &self,
        request: Request<RequestBodyT>,
    ) -> impl Future<Output = Result<Response<Self::ResponseBody>, Self::Error>> + Send;

    /// Send a request upstream and read the whole response.
    fn fetch(&self, request: Request<RequestBodyT>) -> impl Future<Output = Result<Response<Bytes>, FetchError>> + Send
    where
        RequestBodyT: Send,
    {
        let upstream = self.call_upstream(request);
        async move {
            let response = upstream.await.map_err(|error| FetchError::Network(error.into()))?;
            read_response(response).await
        }
    }
}

impl<ServiceT, RequestBodyT, ResponseBodyT> Network<RequestBodyT> for ServiceT
where
    ServiceT: 'static + Service<Request<RequestBodyT>, Response = Response<ResponseBodyT>> + Clone + Send + Sync,
    ServiceT::Future: Send,
    ServiceT::Error: 'static + Into<BoxError> + Send,
    RequestBodyT: 'static + Send,
    ResponseBodyT: 'static + Body<Data = Bytes> + Send + Unpin,
    ResponseBodyT::Error: Into<BoxError>,
{
    type ResponseBody = ResponseBodyT;
    type Error = ServiceT::Error;

    fn call_upstream(
        &self,
        request: Request<RequestBodyT>,
    ) -> impl Future<Output = Result<Response<Self::ResponseBody>, Self::Error>> + Send {
        // Every call drives its own clone to readiness
        self.clone().oneshot(request)
    }
}
