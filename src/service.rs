use super::{
    cache::{implementation::memory::*, *},
    worker::*,
};

use {
    http::{request::*, response::*},
    kutil::std::future::*,
    std::{result::Result, task::*},
    tower::*,
};

//
// OfflineService
//

/// Offline caching service.
///
/// You will often be using [OfflineLayer](super::OfflineLayer) rather than this service directly,
/// thus this service's functionality is documented there.
pub struct OfflineService<InnerServiceT, RequestBodyT, StorageT = MemoryCacheStorage>
where
    InnerServiceT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    worker: OfflineWorker<InnerServiceT, RequestBodyT, StorageT>,
}

impl<InnerServiceT, RequestBodyT, StorageT> OfflineService<InnerServiceT, RequestBodyT, StorageT>
where
    InnerServiceT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    /// Constructor.
    pub fn new(worker: OfflineWorker<InnerServiceT, RequestBodyT, StorageT>) -> Self {
        Self { worker }
    }

    /// The worker.
    ///
    /// Use it to install and activate.
    pub fn worker(&self) -> &OfflineWorker<InnerServiceT, RequestBodyT, StorageT> {
        &self.worker
    }
}

impl<InnerServiceT, RequestBodyT, StorageT> Clone for OfflineService<InnerServiceT, RequestBodyT, StorageT>
where
    InnerServiceT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    fn clone(&self) -> Self {
        Self {
            worker: self.worker.clone(),
        }
    }
}

impl<InnerServiceT, RequestBodyT, StorageT> Service<Request<RequestBodyT>>
    for OfflineService<InnerServiceT, RequestBodyT, StorageT>
where
    InnerServiceT: Network<RequestBodyT>,
    RequestBodyT: 'static + Send,
    StorageT: CacheStorage,
{
    type Response = Response<OfflineBody<InnerServiceT::ResponseBody>>;
    type Error = InnerServiceT::Error;
    type Future = CapturedFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _context: &mut Context) -> Poll<Result<(), Self::Error>> {
        // Every call drives its own clone of the inner service to readiness
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<RequestBodyT>) -> Self::Future {
        let worker = self.worker.clone();
        capture_async! { worker.fetch(request).await }
    }
}
