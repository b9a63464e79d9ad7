use super::{
    super::{cache::*, worker::*},
    headers::*,
};

use ::axum::{
    Json,
    extract::*,
    http::*,
    response::Response,
};

/// Axum request handler that deletes every cache and returns [no_content_handler].
///
/// Expects the worker to be available as state. See
/// [Router::with_state](::axum::Router::with_state).
pub async fn clear_cache_handler<NetworkT, RequestBodyT, StorageT>(
    State(worker): State<OfflineWorker<NetworkT, RequestBodyT, StorageT>>,
) -> Response
where
    NetworkT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    worker.clear_cache().await;
    no_content_handler().await
}

/// Axum request handler that replies with the worker's version as JSON.
///
/// Expects the worker to be available as state. See
/// [Router::with_state](::axum::Router::with_state).
pub async fn version_handler<NetworkT, RequestBodyT, StorageT>(
    State(worker): State<OfflineWorker<NetworkT, RequestBodyT, StorageT>>,
) -> Response
where
    NetworkT: Network<RequestBodyT>,
    StorageT: CacheStorage,
{
    Json(serde_json::json!({ "version": worker.configuration().version })).do_not_cache()
}

/// Axum request handler for [ControlMessage]s posted as JSON.
///
/// Replies with JSON describing the effect, with 204 (No Content) if there was none, or with 409
/// (Conflict) if the worker could not make the requested transition.
///
/// Expects the worker to be available as state. See
/// [Router::with_state](::axum::Router::with_state).
pub async fn message_handler<NetworkT, RequestBodyT, StorageT>(
    State(worker): State<OfflineWorker<NetworkT, RequestBodyT, StorageT>>,
    Json(message): Json<ControlMessage>,
) -> Response
where
    NetworkT: Network<RequestBodyT>,
    RequestBodyT: 'static + Default + Send,
    StorageT: CacheStorage,
{
    match worker.message(message).await {
        Effect::Activated(deleted) => Json(serde_json::json!({ "activated": true, "deleted": deleted })).do_not_cache(),

        Effect::CacheCleared(deleted) => Json(serde_json::json!({ "deleted": deleted })).do_not_cache(),

        Effect::Version(version) => Json(serde_json::json!({ "version": version })).do_not_cache(),

        Effect::Cached(cached) => Json(serde_json::json!({ "cached": cached })).do_not_cache(),

        Effect::Failed(error) => {
            tracing::warn!("{}", error);
            (StatusCode::CONFLICT, error.to_string()).do_not_cache()
        }

        _ => StatusCode::NO_CONTENT.do_not_cache(),
    }
}

/// Axum request handler with no content and no caching.
pub async fn no_content_handler() -> Response {
    StatusCode::NO_CONTENT.do_not_cache()
}
