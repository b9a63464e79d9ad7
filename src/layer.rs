use super::{
    cache::{implementation::memory::*, middleware::*, *},
    notification::*,
    service::*,
    strategy::*,
    worker::*,
};

use {
    std::{marker::*, sync::*},
    tokio::sync::RwLock,
    tower::Layer,
    url::Url,
};

//
// OfflineLayer
//

/// Offline caching layer.
///
/// This layer configures and installs an [OfflineService], which intercepts requests on behalf of
/// an [OfflineWorker] with the inner service as its network.
///
/// The cache storage implementation is provided as a generic type parameter. The default
/// [MemoryCacheStorage] has exact FIFO eviction.
///
/// Usage notes
/// ===========
///
/// 1. The services start out passing every request through. You must [install](OfflineWorker::install)
///    and then [activate](OfflineWorker::activate) a worker before the strategies apply. All
///    workers and services created by the same layer (and its clones) share the lifecycle state
///    and the storage, so you can do it via [worker](Self::worker) or via
///    [OfflineService::worker].
///
/// 2. By default this layer is "opt-out" for caching. You can "punch through" this behavior via the
///    `XX-Cache` custom response header (which will be removed before sending the response
///    downstream):
///
///    * Set `XX-Cache` to "false" to skip caching.
///
///    However, you can also configure for "opt-in", *requiring* this header to be set to "true" in
///    order to enable caching. See [cacheable_by_default](Self::cacheable_by_default).
///
/// 3. Alternatively, you can provide a [cacheable_by_response](Self::cacheable_by_response) hook.
///
/// 4. Routing relies on the request destination and mode. Browsers send them as the
///    `Sec-Fetch-Dest` and `Sec-Fetch-Mode` headers. Hosts that know better can insert a
///    [Destination] or [RequestMode] request extension, which takes precedence.
///
/// 5. Request URIs in origin form (`/path?query`) are resolved against the configured
///    [origin](Self::origin) to make the cache keys, so they will match the precached entries.
///
/// Request handling
/// ================
///
/// See [OfflineWorker].
pub struct OfflineLayer<RequestBodyT, StorageT = MemoryCacheStorage>
where
    StorageT: CacheStorage,
{
    configuration: WorkerConfiguration,
    storage: StorageT,
    state: Arc<RwLock<LifecycleState>>,
    request_body: PhantomData<fn() -> RequestBodyT>,
}

impl<RequestBodyT, StorageT> OfflineLayer<RequestBodyT, StorageT>
where
    StorageT: CacheStorage,
{
    /// Constructor.
    pub fn new(configuration: WorkerConfiguration, storage: StorageT) -> Self {
        Self {
            configuration,
            storage,
            state: Default::default(),
            request_body: PhantomData,
        }
    }

    /// Create a worker for a network.
    ///
    /// It shares the lifecycle state and the storage with this layer's services.
    pub fn worker<NetworkT>(&self, network: NetworkT) -> OfflineWorker<NetworkT, RequestBodyT, StorageT>
    where
        NetworkT: Network<RequestBodyT>,
    {
        OfflineWorker::new_with(
            Arc::new(self.configuration.clone()),
            network,
            self.storage.clone(),
            self.state.clone(),
        )
    }

    /// Storage.
    pub fn storage(&self) -> &StorageT {
        &self.storage
    }

    /// Origin.
    ///
    /// The default is `http://localhost:8000`.
    pub fn origin(mut self, origin: Url) -> Self {
        self.configuration.origin = origin;
        self
    }

    /// Version.
    ///
    /// Together with the prefix it names the precache store.
    ///
    /// The default is "v1".
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.configuration.version = version.into();
        self
    }

    /// Precache manifest.
    ///
    /// The offline page is always added.
    pub fn precache<IteratorT>(mut self, precache: IteratorT) -> Self
    where
        IteratorT: IntoIterator,
        IteratorT::Item: Into<String>,
    {
        self.configuration = self.configuration.precache(precache);
        self
    }

    /// Offline page.
    ///
    /// The default is "/offline/".
    pub fn offline_page(mut self, offline_page: impl Into<String>) -> Self {
        self.configuration.offline_page = offline_page.into();
        self
    }

    /// Route table.
    ///
    /// The default is [RouteTable::application].
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.configuration.routes = routes;
        self
    }

    /// Notification defaults.
    pub fn notifications(mut self, notifications: NotificationDefaults) -> Self {
        self.configuration.notifications = notifications;
        self
    }

    /// Maximum size in bytes of response bodies to cache.
    ///
    /// Larger responses are served but not cached.
    ///
    /// The default is 1 MiB.
    pub fn max_cacheable_body_size(mut self, max_cacheable_body_size: usize) -> Self {
        self.configuration.caching.max_body_size = max_cacheable_body_size;
        self
    }

    /// If a response does not specify the `XX-Cache` response header then this we will assume its
    /// value is this.
    ///
    /// The default is true.
    pub fn cacheable_by_default(mut self, cacheable_by_default: bool) -> Self {
        self.configuration.caching.cacheable_by_default = cacheable_by_default;
        self
    }

    /// Provide a hook to test whether a network response is cacheable.
    ///
    /// Will only be called after all internal conditions are met, giving you one last chance to
    /// prevent caching.
    ///
    /// Note that the headers are *response* headers.
    ///
    /// [None] by default.
    pub fn cacheable_by_response(
        mut self,
        cacheable_by_response: impl Fn(CacheableHookContext) -> bool + 'static + Send + Sync,
    ) -> Self {
        self.configuration.caching.cacheable_by_response = Some(Arc::new(Box::new(cacheable_by_response)));
        self
    }
}

impl<RequestBodyT, StorageT> Default for OfflineLayer<RequestBodyT, StorageT>
where
    StorageT: CacheStorage + Default,
{
    fn default() -> Self {
        Self::new(Default::default(), Default::default())
    }
}

impl<RequestBodyT, StorageT> Clone for OfflineLayer<RequestBodyT, StorageT>
where
    StorageT: CacheStorage,
{
    fn clone(&self) -> Self {
        Self {
            configuration: self.configuration.clone(),
            storage: self.storage.clone(),
            state: self.state.clone(),
            request_body: PhantomData,
        }
    }
}

impl<InnerServiceT, RequestBodyT, StorageT> Layer<InnerServiceT> for OfflineLayer<RequestBodyT, StorageT>
where
    InnerServiceT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    type Service = OfflineService<InnerServiceT, RequestBodyT, StorageT>;

    fn layer(&self, inner_service: InnerServiceT) -> Self::Service {
        OfflineService::new(self.worker(inner_service))
    }
}
