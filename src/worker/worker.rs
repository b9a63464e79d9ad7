use super::{
    super::{
        cache::{implementation::memory::*, middleware::*, *},
        error::*,
        notification::*,
        strategy::*,
    },
    configuration::*,
    event::*,
    message::*,
    network::*,
    state::*,
};

use {
    bytes::*,
    http::*,
    kutil::http::*,
    std::{marker::*, result::Result, sync::*},
    tokio::{sync::RwLock, task, time},
};

//
// OfflineWorker
//

/// Offline worker.
///
/// One instance serves one deployed version, as described by its [WorkerConfiguration]. It sits
/// between its host and a [Network], answering requests according to the route table and keeping
/// its caches in a [CacheStorage].
///
/// Cloning is cheap and clones share the lifecycle state and the storage.
///
/// Lifecycle
/// =========
///
/// 1. [install](Self::install) fetches the whole precache manifest and commits it to the precache
///    store (e.g. `kibray-v1`). It is all-or-nothing: if any entry fails nothing is written and the
///    worker becomes [Redundant](LifecycleState::Redundant).
///
/// 2. [activate](Self::activate) deletes every cache not named by this version's configuration.
///
/// 3. Only then does [fetch](Self::fetch) apply the strategies. Before activation, and for
///    non-`GET` requests, fetches pass straight through to the network.
///
/// Request handling
/// ================
///
/// The first matching route decides. Cross-origin requests (and requests matching no route) are
/// passed through as is. Otherwise the route's [Strategy] applies:
///
/// * [NetworkFirst](StrategyKind::NetworkFirst): fetch, bounded by the network timeout if there
///   is one. On failure try the route's cache and then all caches. A timed-out fetch keeps running
///   in the background and still updates the cache if it succeeds.
/// * [CacheFirst](StrategyKind::CacheFirst): serve from the route's cache, fetching only on a
///   miss.
/// * [StaleWhileRevalidate](StrategyKind::StaleWhileRevalidate): serve from the route's cache and
///   refresh the entry in the background, fetching in the foreground only on a miss.
///
/// When nothing can answer we serve the route's [OfflineFallback]: the precached offline page or a
/// 503.
///
/// Network responses are stored only if they are cacheable, see
/// [should_skip_cache](UpstreamResponse::should_skip_cache).
pub struct OfflineWorker<NetworkT, RequestBodyT, StorageT = MemoryCacheStorage>
where
    NetworkT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    configuration: Arc<WorkerConfiguration>,
    network: NetworkT,
    storage: StorageT,
    state: Arc<RwLock<LifecycleState>>,
    request_body: PhantomData<fn() -> RequestBodyT>,
}

impl<NetworkT, RequestBodyT, StorageT> OfflineWorker<NetworkT, RequestBodyT, StorageT>
where
    NetworkT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    /// Constructor.
    pub fn new(configuration: WorkerConfiguration, network: NetworkT, storage: StorageT) -> Self {
        Self::new_with(Arc::new(configuration), network, storage, Default::default())
    }

    /// Constructor.
    ///
    /// Workers constructed with the same lifecycle state share it.
    pub fn new_with(
        configuration: Arc<WorkerConfiguration>,
        network: NetworkT,
        storage: StorageT,
        state: Arc<RwLock<LifecycleState>>,
    ) -> Self {
        Self {
            configuration,
            network,
            storage,
            state,
            request_body: PhantomData,
        }
    }

    /// Configuration.
    pub fn configuration(&self) -> &WorkerConfiguration {
        &self.configuration
    }

    /// Network.
    pub fn network(&self) -> &NetworkT {
        &self.network
    }

    /// Storage.
    pub fn storage(&self) -> &StorageT {
        &self.storage
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        *self.state.read().await
    }

    /// Notification dispatcher.
    pub fn dispatcher(&self) -> NotificationDispatcher {
        NotificationDispatcher::new(self.configuration.notifications.clone(), self.configuration.origin.clone())
    }

    /// Cache key for a `GET` of the URI.
    ///
    /// Relative URIs are resolved against the origin.
    pub fn cache_key(&self, uri: &Uri) -> RequestCacheKey {
        RequestCacheKey::get(&self.absolute_uri(uri))
    }

    /// The URI resolved against the origin.
    ///
    /// The path and query are kept verbatim, so a path starting with `//` stays a path on our
    /// origin.
    pub fn absolute_uri(&self, uri: &Uri) -> Uri {
        if uri.scheme().is_some() {
            return uri.clone();
        }

        let origin = &self.configuration.origin;
        let authority = match (origin.host_str(), origin.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.into(),

            (None, _) => {
                tracing::warn!("origin has no host: {}", origin);
                return uri.clone();
            }
        };

        let path_and_query = uri.path_and_query().map(|path_and_query| path_and_query.as_str()).unwrap_or("/");

        match Uri::builder()
            .scheme(origin.scheme())
            .authority(authority.as_str())
            .path_and_query(path_and_query)
            .build()
        {
            Ok(uri) => uri,

            Err(error) => {
                tracing::warn!("cannot resolve {}: {}", uri, error);
                uri.clone()
            }
        }
    }

    /// Show a notification for a push payload.
    pub fn push(&self, payload: Option<&[u8]>) -> Notification {
        self.dispatcher().display(payload)
    }

    /// Route a notification click.
    pub fn notification_click(&self, click: &NotificationClick) -> ClickAction {
        self.dispatcher().route_click(click)
    }

    /// Activate.
    ///
    /// Deletes every cache not named by this version's configuration and starts intercepting
    /// fetches. Returns the deleted cache names.
    ///
    /// Only an [Installed](LifecycleState::Installed) worker can be activated.
    pub async fn activate(&self) -> Result<Vec<String>, LifecycleError> {
        self.transition("activate", LifecycleState::can_activate, LifecycleState::Activating)
            .await?;

        let keep = self.configuration.cache_names();
        let mut deleted = Vec::default();
        for name in self.storage.names().await {
            if !keep.contains(&name) && self.storage.delete(&name).await {
                tracing::info!("deleted stale cache: {}", name);
                deleted.push(name);
            }
        }

        *self.state.write().await = LifecycleState::Activated;
        tracing::info!("activated: {}", self.configuration.version);

        Ok(deleted)
    }

    /// Delete all caches.
    ///
    /// Returns the deleted cache names.
    pub async fn clear_cache(&self) -> Vec<String> {
        let deleted = self.storage.clear().await;
        tracing::info!("cleared {} caches", deleted.len());
        deleted
    }

    async fn transition<PredicateT>(
        &self,
        transition: &'static str,
        allowed: PredicateT,
        next: LifecycleState,
    ) -> Result<(), LifecycleError>
    where
        PredicateT: Fn(&LifecycleState) -> bool,
    {
        let mut state = self.state.write().await;
        if !allowed(&*state) {
            return Err(LifecycleError::InvalidState {
                transition,
                state: *state,
            });
        }
        *state = next;
        Ok(())
    }

    async fn open(&self, strategy: &Strategy) -> StorageT::Cache {
        match &strategy.cache_name {
            Some(cache_name) => self.storage.open_with(cache_name, strategy.bounds).await,
            None => self.storage.open(&self.configuration.precache_name()).await,
        }
    }
}

impl<NetworkT, RequestBodyT, StorageT> OfflineWorker<NetworkT, RequestBodyT, StorageT>
where
    NetworkT: Network<RequestBodyT>,
    RequestBodyT: 'static + Send,
    StorageT: CacheStorage,
{
    /// Install.
    ///
    /// Fetches every entry of the precache manifest and commits them all to the precache store.
    /// Any failure fails the whole install, writes nothing, and leaves the worker
    /// [Redundant](LifecycleState::Redundant). Returns the number of precached entries.
    ///
    /// Can be repeated: installing again with the same manifest produces the same entries.
    pub async fn install(&self) -> Result<usize, LifecycleError>
    where
        RequestBodyT: Default,
    {
        self.transition("install", LifecycleState::can_install, LifecycleState::Installing)
            .await?;

        tracing::info!("installing: {}", self.configuration.precache_name());

        match self.precache().await {
            Ok(count) => {
                *self.state.write().await = LifecycleState::Installed;
                tracing::info!("installed: {} entries", count);
                Ok(count)
            }

            Err(error) => {
                *self.state.write().await = LifecycleState::Redundant;
                tracing::error!("install failed: {}", error);
                Err(error.into())
            }
        }
    }

    /// Fetch URLs into the precache store.
    ///
    /// Best effort: failures and non-cacheable responses are skipped. Returns the cached URLs.
    pub async fn cache_urls(&self, urls: Vec<String>) -> Vec<String>
    where
        RequestBodyT: Default,
    {
        let cache = self.storage.open(&self.configuration.precache_name()).await;

        let mut cached = Vec::with_capacity(urls.len());
        for url in urls {
            let uri = match url.parse::<Uri>() {
                Ok(uri) => self.absolute_uri(&uri),

                Err(error) => {
                    tracing::warn!("invalid URL {:?}: {}", url, error);
                    continue;
                }
            };

            match self.network.fetch(get_request(uri.clone())).await {
                Ok(response) if !response.should_skip_cache(&uri, &self.configuration.caching) => {
                    tracing::debug!("store: {}", uri);
                    cache
                        .put(RequestCacheKey::get(&uri), Arc::new(CachedResponse::new_for(&response)))
                        .await;
                    cached.push(url);
                }

                Ok(_) => {}

                Err(error) => tracing::warn!("could not cache {}: {}", uri, error),
            }
        }

        cached
    }

    /// Handle a control message.
    pub async fn message(&self, message: ControlMessage) -> Effect<NetworkT::ResponseBody, NetworkT::Error>
    where
        RequestBodyT: Default,
    {
        tracing::debug!("message: {:?}", message);

        match message {
            ControlMessage::SkipWaiting => {
                if self.state().await.can_activate() {
                    match self.activate().await {
                        Ok(deleted) => Effect::Activated(deleted),
                        Err(error) => Effect::Failed(error),
                    }
                } else {
                    Effect::Ignored
                }
            }

            ControlMessage::ClearCache => Effect::CacheCleared(self.clear_cache().await),

            ControlMessage::GetVersion => Effect::Version(self.configuration.version.clone()),

            ControlMessage::CacheUrls { urls } => Effect::Cached(self.cache_urls(urls).await),
        }
    }

    /// Handle a lifecycle event.
    ///
    /// This is the single entry point for hosts that deliver events.
    pub async fn handle(
        &self,
        event: LifecycleEvent<RequestBodyT>,
    ) -> Effect<NetworkT::ResponseBody, NetworkT::Error>
    where
        RequestBodyT: Default,
    {
        match event {
            LifecycleEvent::Install => match self.install().await {
                Ok(count) => Effect::Installed(count),
                Err(error) => Effect::Failed(error),
            },

            LifecycleEvent::Activate => match self.activate().await {
                Ok(deleted) => Effect::Activated(deleted),
                Err(error) => Effect::Failed(error),
            },

            LifecycleEvent::Fetch(request) => Effect::Respond(self.fetch(request).await),

            LifecycleEvent::Push(payload) => Effect::ShowNotification(self.push(payload.as_deref())),

            LifecycleEvent::NotificationClick(click) => Effect::Click(self.notification_click(&click)),

            LifecycleEvent::Message(message) => self.message(message).await,
        }
    }

    /// Intercept a request.
    ///
    /// Only a bypassed request can fail, with the network's error. All other failures are
    /// recovered with a cached response or the offline fallback.
    pub async fn fetch(
        &self,
        request: Request<RequestBodyT>,
    ) -> Result<Response<OfflineBody<NetworkT::ResponseBody>>, NetworkT::Error> {
        if !self.state().await.can_intercept_fetch() {
            tracing::debug!("bypass (not activated)");
            return self.bypass(request).await;
        }

        if request.method() != Method::GET {
            tracing::debug!("bypass (method={})", request.method());
            return self.bypass(request).await;
        }

        match self.configuration.routes.select(&request, &self.configuration.origin) {
            Some(RouteAction::Strategy(strategy)) => {
                tracing::debug!("{}: {}", strategy, request.uri());
                Ok(self.serve(strategy, request).await.map(OfflineBody::full))
            }

            Some(RouteAction::Bypass) => {
                tracing::debug!("bypass: {}", request.uri());
                self.bypass(request).await
            }

            None => {
                tracing::debug!("bypass (no route): {}", request.uri());
                self.bypass(request).await
            }
        }
    }

    async fn bypass(
        &self,
        request: Request<RequestBodyT>,
    ) -> Result<Response<OfflineBody<NetworkT::ResponseBody>>, NetworkT::Error> {
        self.network
            .call_upstream(request)
            .await
            .map(|response| response.map(OfflineBody::upstream).with_source(ResponseSource::Bypass))
    }

    async fn serve(&self, strategy: &Strategy, request: Request<RequestBodyT>) -> Response<Bytes> {
        let key = self.cache_key(request.uri());
        let cache = self.open(strategy).await;

        let response = match strategy.kind {
            StrategyKind::NetworkFirst => self.network_first(strategy, cache, key, request).await,
            StrategyKind::CacheFirst => self.cache_first(cache, key, request).await,
            StrategyKind::StaleWhileRevalidate => self.stale_while_revalidate(cache, key, request).await,
        };

        match response {
            Some(response) => response,
            None => self.fallback(strategy).await,
        }
    }

    async fn network_first(
        &self,
        strategy: &Strategy,
        cache: StorageT::Cache,
        key: RequestCacheKey,
        request: Request<RequestBodyT>,
    ) -> Option<Response<Bytes>> {
        let fetch = self.fetch_and_store(cache.clone(), key.clone(), request);

        let fetched = match strategy.network_timeout {
            Some(timeout) => {
                // The task keeps running if we stop waiting for it
                let mut fetch = task::spawn(fetch);
                match time::timeout(timeout, &mut fetch).await {
                    Ok(Ok(fetched)) => fetched,
                    Ok(Err(error)) => Err(FetchError::Network(error.into())),
                    Err(_) => Err(FetchError::Timeout(timeout)),
                }
            }

            None => fetch.await,
        };

        match fetched {
            Ok(response) => return Some(from_network(response)),
            Err(error) => tracing::debug!("network failed: {}", error),
        }

        if let Some(cached_response) = cache.get(&key).await {
            tracing::debug!("hit");
            return Some(cached_response.to_response().with_source(ResponseSource::Cache));
        }

        if let Some(cached_response) = self.storage.match_any(&key).await {
            tracing::debug!("hit (other cache)");
            return Some(cached_response.to_response().with_source(ResponseSource::Cache));
        }

        tracing::debug!("miss");
        None
    }

    async fn cache_first(
        &self,
        cache: StorageT::Cache,
        key: RequestCacheKey,
        request: Request<RequestBodyT>,
    ) -> Option<Response<Bytes>> {
        if let Some(cached_response) = cache.get(&key).await {
            tracing::debug!("hit");
            return Some(cached_response.to_response().with_source(ResponseSource::Cache));
        }

        tracing::debug!("miss");
        match self.fetch_and_store(cache, key, request).await {
            Ok(response) => Some(from_network(response)),

            Err(error) => {
                tracing::debug!("network failed: {}", error);
                None
            }
        }
    }

    async fn stale_while_revalidate(
        &self,
        cache: StorageT::Cache,
        key: RequestCacheKey,
        request: Request<RequestBodyT>,
    ) -> Option<Response<Bytes>> {
        match cache.get(&key).await {
            Some(cached_response) => {
                tracing::debug!("hit (revalidating)");

                let revalidate = self.fetch_and_store(cache, key, request);
                task::spawn(async move {
                    if let Err(error) = revalidate.await {
                        tracing::debug!("revalidation failed: {}", error);
                    }
                });

                Some(cached_response.to_response().with_source(ResponseSource::Cache))
            }

            None => {
                tracing::debug!("miss");
                match self.fetch_and_store(cache, key, request).await {
                    Ok(response) => Some(from_network(response)),

                    Err(error) => {
                        tracing::debug!("network failed: {}", error);
                        None
                    }
                }
            }
        }
    }

    async fn fallback(&self, strategy: &Strategy) -> Response<Bytes> {
        if strategy.fallback == OfflineFallback::OfflinePage {
            match self.offline_page().await {
                Some(cached_response) => {
                    tracing::debug!("offline page");
                    return cached_response.to_response().with_source(ResponseSource::Fallback);
                }

                None => tracing::warn!("offline page is not precached: {}", self.configuration.offline_page),
            }
        }

        tracing::debug!("offline");
        service_unavailable_response().with_source(ResponseSource::Fallback)
    }

    async fn offline_page(&self) -> Option<CachedResponseRef> {
        let uri = self.configuration.offline_page.parse::<Uri>().ok()?;
        let cache = self.storage.existing(&self.configuration.precache_name()).await?;
        cache.get(&self.cache_key(&uri)).await
    }

    async fn precache(&self) -> Result<usize, InstallError>
    where
        RequestBodyT: Default,
    {
        // Staged so that a failure leaves the precache store untouched
        let mut staged = Vec::default();
        for url in self.configuration.precache_manifest() {
            let uri = url
                .parse::<Uri>()
                .map(|uri| self.absolute_uri(&uri))
                .map_err(|source| InstallError::InvalidUrl {
                    url: url.clone(),
                    source,
                })?;

            let response = match self.network.fetch(get_request(uri.clone())).await {
                Ok(response) => response,
                Err(source) => return Err(InstallError::Fetch { url, source }),
            };

            let status = response.status();
            if status != StatusCode::OK {
                return Err(InstallError::Status { url, status });
            }

            tracing::debug!("precached: {}", uri);
            staged.push((RequestCacheKey::get(&uri), CachedResponse::new_for(&response)));
        }

        let cache = self.storage.open(&self.configuration.precache_name()).await;
        let count = staged.len();
        for (key, cached_response) in staged {
            cache.put(key, Arc::new(cached_response)).await;
        }

        Ok(count)
    }

    // Owns everything it needs so that it can be spawned.
    fn fetch_and_store(
        &self,
        cache: StorageT::Cache,
        key: RequestCacheKey,
        request: Request<RequestBodyT>,
    ) -> impl Future<Output = Result<Response<Bytes>, FetchError>> + Send + use<NetworkT, RequestBodyT, StorageT> {
        let network = self.network.clone();
        let configuration = self.configuration.clone();

        async move {
            let uri = request.uri().clone();
            let response = network.fetch(request).await?;

            if !response.should_skip_cache(&uri, &configuration.caching) {
                tracing::debug!("store: {}", key);
                cache.put(key, Arc::new(CachedResponse::new_for(&response))).await;
            }

            Ok(response)
        }
    }
}

impl<NetworkT, RequestBodyT, StorageT> Clone for OfflineWorker<NetworkT, RequestBodyT, StorageT>
where
    NetworkT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    fn clone(&self) -> Self {
        Self {
            configuration: self.configuration.clone(),
            network: self.network.clone(),
            storage: self.storage.clone(),
            state: self.state.clone(),
            request_body: PhantomData,
        }
    }
}

fn get_request<RequestBodyT>(uri: Uri) -> Request<RequestBodyT>
where
    RequestBodyT: Default,
{
    let mut request = Request::new(RequestBodyT::default());
    *request.uri_mut() = uri;
    request
}

fn from_network(mut response: Response<Bytes>) -> Response<Bytes> {
    response.headers_mut().remove(XX_CACHE);
    response.with_source(ResponseSource::Network)
}
