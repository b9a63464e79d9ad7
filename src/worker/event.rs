use super::{
    super::{cache::*, error::*, notification::*},
    message::*,
};

use {bytes::*, http::*, std::result::Result};

//
// LifecycleEvent
//

/// Event delivered to the worker by its host.
#[derive(Debug)]
pub enum LifecycleEvent<RequestBodyT> {
    /// Precache the manifest.
    Install,

    /// Collect stale caches and start intercepting fetches.
    Activate,

    /// Intercept a request.
    Fetch(Request<RequestBodyT>),

    /// Push message with its (optional) payload.
    Push(Option<Bytes>),

    /// Notification click.
    NotificationClick(NotificationClick),

    /// Message from the hosting page.
    Message(ControlMessage),
}

//
// Effect
//

/// What the host should do in response to a [LifecycleEvent].
#[derive(Debug)]
pub enum Effect<ResponseBodyT, ErrorT> {
    /// Installed with this many precached entries.
    Installed(usize),

    /// Activated, having deleted these caches.
    Activated(Vec<String>),

    /// Lifecycle transition failed.
    Failed(LifecycleError),

    /// Respond to the intercepted request.
    Respond(Result<Response<OfflineBody<ResponseBodyT>>, ErrorT>),

    /// Show a notification.
    ShowNotification(Notification),

    /// Act on a notification click.
    Click(ClickAction),

    /// These caches were deleted.
    CacheCleared(Vec<String>),

    /// Reply with the worker's version.
    Version(String),

    /// These URLs were cached.
    Cached(Vec<String>),

    /// Nothing to do.
    Ignored,
}
