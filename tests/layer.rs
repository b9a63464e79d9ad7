mod utils;

use {
    http::*,
    tower::{Layer, ServiceExt},
    tower_http_offline_cache::{
        cache::{implementation::memory::*, middleware::*, *},
        strategy::*,
        worker::*,
        *,
    },
    utils::*,
};

fn layer() -> OfflineLayer<()> {
    OfflineLayer::default()
        .origin(origin())
        .precache(["/", "/static/css/main.css"])
}

#[tokio::test]
async fn service_intercepts_after_activation() {
    init_tracing();

    let network = network();
    let service = layer().layer(network.clone());

    // Passes through before install
    let response = service.clone().oneshot(get("/api/v1/projects/")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Bypass));

    service.worker().install().await.unwrap();
    service.worker().activate().await.unwrap();

    let response = service.clone().oneshot(get("/api/v1/projects/")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Network));

    network.set_offline(true);

    let response = service.clone().oneshot(get("/api/v1/projects/")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Cache));
    assert_eq!(body_string(response).await, r#"[{"id":1}]"#);

    let response = service.oneshot(navigate("/reports/")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Fallback));
    assert_eq!(body_string(response).await, "offline page");
}

#[tokio::test]
async fn services_share_state_and_storage() {
    init_tracing();

    let network = network();
    let layer = layer();

    // Installing and activating via the layer's worker applies to all its services
    let worker = layer.worker(network.clone());
    worker.install().await.unwrap();
    worker.activate().await.unwrap();

    let first = layer.layer(network.clone());
    let second = layer.layer(network.clone());
    assert_eq!(second.worker().state().await, LifecycleState::Activated);

    first.oneshot(load("/static/img/logo.png", "image")).await.unwrap();

    network.set_offline(true);

    let response = second.oneshot(load("/static/img/logo.png", "image")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Cache));
    assert!(layer.storage().has(IMAGES_CACHE).await);
}

#[tokio::test]
async fn opt_in_caching() {
    init_tracing();

    let network = network();
    network.respond(
        "/api/v1/cacheable/",
        Response::builder()
            .header("XX-Cache", "true")
            .body("yes".into())
            .unwrap(),
    );

    let service = layer().cacheable_by_default(false).layer(network.clone());
    service.worker().install().await.unwrap();
    service.worker().activate().await.unwrap();

    service.clone().oneshot(get("/api/v1/projects/")).await.unwrap();
    service.clone().oneshot(get("/api/v1/cacheable/")).await.unwrap();

    let api = service.worker().storage().existing(API_CACHE).await.unwrap();
    assert_eq!(
        api.keys().await,
        vec![service.worker().cache_key(&Uri::from_static("/api/v1/cacheable/"))]
    );
}

#[tokio::test]
async fn cacheable_hook_and_body_size() {
    init_tracing();

    let network = network();
    network
        .serve("/api/v1/reports/", "report")
        .serve("/api/v1/large/", "a body that is too large");

    let service = layer()
        .max_cacheable_body_size(16)
        .cacheable_by_response(|context| !context.uri.path().contains("/reports/"))
        .layer(network.clone());
    service.worker().install().await.unwrap();
    service.worker().activate().await.unwrap();

    for path in ["/api/v1/projects/", "/api/v1/reports/", "/api/v1/large/"] {
        let response = service.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let api = service.worker().storage().existing(API_CACHE).await.unwrap();
    assert_eq!(
        api.keys().await,
        vec![service.worker().cache_key(&Uri::from_static("/api/v1/projects/"))]
    );
}

#[tokio::test]
async fn custom_routes() {
    init_tracing();

    let network = network();
    network.serve("/media/clip.mp4", "clip");

    let routes = RouteTable::default()
        .strategy(
            RouteMatcher::PathPrefix(vec!["/media/".into()]),
            Strategy::cache_first().cache_name("media-cache").max_entries(5),
        )
        .strategy(RouteMatcher::Any, Strategy::network_first());

    let service = layer().routes(routes).version("v7").layer(network.clone());
    service.worker().install().await.unwrap();
    service.worker().activate().await.unwrap();

    service.clone().oneshot(get("/media/clip.mp4")).await.unwrap();

    let names: Vec<_> = service.worker().storage().names().await.into_iter().collect();
    assert_eq!(names, vec!["kibray-v7".to_string(), "media-cache".into()]);

    // Unmatched by a named route: the network-first fallback uses the precache store
    network.set_offline(true);
    let response = service.oneshot(get("/static/css/main.css")).await.unwrap();
    assert_eq!(response.source(), Some(ResponseSource::Cache));
    assert_eq!(body_string(response).await, "body{}");
}

#[tokio::test]
async fn custom_storage() {
    init_tracing();

    let network = network();
    let storage = MemoryCacheStorage::default();
    let layer: OfflineLayer<()> = OfflineLayer::new(
        WorkerConfiguration::default()
            .origin(origin())
            .precache(["/"]),
        storage.clone(),
    );

    let service = layer.layer(network.clone());
    assert_eq!(service.worker().install().await.unwrap(), 2);

    // The caller's storage handle sees the precache store
    assert!(storage.has("kibray-v1").await);
}
