mod utils;

use {
    bytes::*,
    tower_http_offline_cache::{
        cache::{implementation::memory::*, *},
        notification::*,
        strategy::*,
        worker::*,
    },
    url::Url,
    utils::*,
};

#[tokio::test]
async fn get_version() {
    init_tracing();

    let worker = activated(&network(), configuration().version("v3")).await;

    let message = ControlMessage::from_json(br#"{"type":"GET_VERSION"}"#).unwrap();
    match worker.handle(LifecycleEvent::Message(message)).await {
        Effect::Version(version) => assert_eq!(version, "v3"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn skip_waiting() {
    init_tracing();

    let network = network();
    let worker = OfflineWorker::new(configuration(), network.clone(), MemoryCacheStorage::default());

    // Nothing to skip before install
    assert!(matches!(worker.message(ControlMessage::SkipWaiting).await, Effect::Ignored));
    assert_eq!(worker.state().await, LifecycleState::Parsed);

    worker.install().await.unwrap();

    assert!(matches!(worker.message(ControlMessage::SkipWaiting).await, Effect::Activated(_)));
    assert_eq!(worker.state().await, LifecycleState::Activated);

    // Already active
    assert!(matches!(worker.message(ControlMessage::SkipWaiting).await, Effect::Ignored));
}

#[tokio::test]
async fn clear_cache() {
    init_tracing();

    let network = network();
    let worker = activated(&network, configuration()).await;
    worker.fetch(get("/api/v1/projects/")).await.unwrap();

    match worker.message(ControlMessage::ClearCache).await {
        Effect::CacheCleared(deleted) => assert_eq!(deleted, vec![API_CACHE.to_string(), "kibray-v1".into()]),
        other => panic!("unexpected: {:?}", other),
    }

    assert!(worker.storage().names().await.is_empty());

    // Still activated, so the offline page is now missing too
    network.set_offline(true);
    let response = worker.fetch(navigate("/dashboard/")).await.unwrap();
    assert_eq!(body_string(response).await, "Offline");
}

#[tokio::test]
async fn cache_urls() {
    init_tracing();

    let network = network();
    let worker = activated(&network, configuration()).await;

    let message = ControlMessage::from_json(
        br#"{"type":"CACHE_URLS","urls":["/dashboard/","/missing/","https://app.kibray.example/static/js/main.js"]}"#,
    )
    .unwrap();

    match worker.message(message).await {
        Effect::Cached(cached) => assert_eq!(
            cached,
            vec![
                "/dashboard/".to_string(),
                "https://app.kibray.example/static/js/main.js".into()
            ]
        ),
        other => panic!("unexpected: {:?}", other),
    }

    // Available offline now
    network.set_offline(true);
    let response = worker.fetch(navigate("/dashboard/")).await.unwrap();
    assert_eq!(body_string(response).await, "dashboard");
}

#[tokio::test]
async fn push_and_click() {
    init_tracing();

    let worker = activated(&network(), configuration()).await;

    let payload =
        Bytes::from_static(br#"{"title":"Change order","body":"Approved","data":{"url":"/changeorders/12/"}}"#);
    let notification = match worker.handle(LifecycleEvent::Push(Some(payload))).await {
        Effect::ShowNotification(notification) => notification,
        other => panic!("unexpected: {:?}", other),
    };
    assert_eq!(notification.title, "Change order");
    assert_eq!(notification.body, "Approved");
    assert_eq!(notification.url, "/changeorders/12/");

    let open = Url::parse("https://app.kibray.example/changeorders/12/").unwrap();
    let elsewhere = Url::parse("https://app.kibray.example/dashboard/").unwrap();

    // An open window at the target is focused
    let click = NotificationClick::new(
        notification.clone(),
        None,
        vec![ClientWindow::new("a", elsewhere.clone()), ClientWindow::new("b", open.clone())],
    );
    match worker.handle(LifecycleEvent::NotificationClick(click)).await {
        Effect::Click(action) => assert_eq!(
            action,
            ClickAction::Focus {
                client_id: "b".into()
            }
        ),
        other => panic!("unexpected: {:?}", other),
    }

    // Otherwise a new one is opened
    let click = NotificationClick::new(notification.clone(), None, vec![ClientWindow::new("a", elsewhere)]);
    assert_eq!(worker.notification_click(&click), ClickAction::OpenWindow { url: open });

    // Dismissing does neither
    let click = NotificationClick::new(notification, Some("dismiss".into()), Vec::default());
    assert_eq!(worker.notification_click(&click), ClickAction::Dismiss);
}

#[tokio::test]
async fn empty_push() {
    init_tracing();

    let worker = activated(&network(), configuration()).await;

    let notification = worker.push(None);
    assert_eq!(notification.title, DEFAULT_TITLE);
    assert_eq!(notification.body, DEFAULT_BODY);
    assert_eq!(notification.url, DEFAULT_URL);
}
