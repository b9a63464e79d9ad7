mod utils;

use {
    ::axum::{routing::*, *},
    std::time::*,
    tokio::{net::*, *},
    tower_http::trace::*,
    tower_http_offline_cache::{axum::*, cache::implementation::memory::*, strategy::*, worker::*, *},
    url::Url,
};

// Axum server with the offline layer in front of a tiny version of the Kibray application
//
// Pay attention to the tracing log to see which strategy handles each request and where each
// response comes from!
//
// Some fun things to try:
//
//   curl http://localhost:8080/api/v1/projects/
//
//   curl -H 'Sec-Fetch-Dest: image' http://localhost:8080/static/img/logo.png
//
//   curl -H 'Sec-Fetch-Mode: navigate' http://localhost:8080/dashboard/
//
//   curl -X POST -H 'Content-Type: application/json' -d '{"type":"GET_VERSION"}' \
//     http://localhost:8080/worker/message
//
//   curl -X POST -H 'Content-Type: application/json' -d '{"type":"CLEAR_CACHE"}' \
//     http://localhost:8080/worker/message
//
// The "slow" endpoint takes longer than the API timeout, so the first request is answered with
// the offline 503 while the fetch completes and fills the cache in the background:
//
//   curl http://localhost:8080/api/v1/slow/
//   curl http://localhost:8080/api/v1/slow/

type Worker = OfflineWorker<Router, body::Body, MemoryCacheStorage>;

const ORIGIN: &str = "http://localhost:8080";

const API_TIMEOUT: Duration = Duration::from_secs(2);

#[main]
async fn main() {
    utils::init_tracing();

    // The application

    let application = Router::default()
        .route("/", get(("Kibray\n",)))
        .route("/dashboard/", get(("Dashboard\n",)))
        .route("/offline/", get(("You are offline\n",)))
        .route("/static/css/main.css", get(("body { margin: 0 }\n",)))
        .route("/static/img/logo.png", get(("PNG\n",)))
        .route("/api/v1/projects/", get(|| async { Json(serde_json::json!([{ "id": 1, "name": "Lobby" }])) }))
        .route(
            "/api/v1/slow/",
            get(|| async {
                time::sleep(API_TIMEOUT * 2).await;
                "Finally\n"
            }),
        )
        .route("/api/v1/private/", get(|| async { "Not for caching\n".do_not_cache() }));

    // Configure the offline layer with a shorter API timeout

    let routes = RouteTable::default()
        .route(RouteMatcher::CrossOrigin, RouteAction::Bypass)
        .strategy(
            RouteMatcher::PathPrefix(vec![API_PATH_PREFIX.into()]),
            Strategy::network_first()
                .cache_name(API_CACHE)
                .max_entries(50)
                .max_age(Duration::from_secs(60 * 60))
                .network_timeout(API_TIMEOUT),
        )
        .strategy(
            RouteMatcher::Destination(vec![Destination::Image]),
            Strategy::cache_first().cache_name(IMAGES_CACHE).max_entries(100),
        )
        .strategy(
            RouteMatcher::Navigation,
            Strategy::network_first()
                .cache_name(PAGES_CACHE)
                .fallback(OfflineFallback::OfflinePage),
        )
        .strategy(RouteMatcher::Any, Strategy::network_first());

    let offline = OfflineLayer::<body::Body>::default()
        .origin(Url::parse(ORIGIN).expect("Url::parse"))
        .precache(["/", "/static/css/main.css"])
        .routes(routes);

    // Install and activate before serving
    // (The worker shares its lifecycle state and caches with the layer's services)

    let worker: Worker = offline.worker(application.clone());
    let precached = worker.install().await.expect("install");
    tracing::info!("precached {} entries", precached);
    worker.activate().await.expect("activate");

    let control = Router::default()
        .route("/worker/message", post(message_handler::<Router, body::Body, MemoryCacheStorage>))
        .route("/worker/version", get(version_handler::<Router, body::Body, MemoryCacheStorage>))
        .route("/worker/clear", post(clear_cache_handler::<Router, body::Body, MemoryCacheStorage>))
        .with_state(worker);

    let router = application
        .layer(offline)
        .merge(control)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("[::]:8080")
        .await
        .expect("TcpListener::bind");
    // If IPv6 is disabled on your machine (for shame!):
    // let listener = TcpListener::bind("0.0.0.0:8080").await.expect("bind");
    tracing::info!("bound to: {:?}", listener.local_addr());
    serve(listener, router).await.expect("axum::serve");
}
