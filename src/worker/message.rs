use serde::*;

//
// ControlMessage
//

/// Message posted to the worker by the hosting page.
///
/// Serialized as a JSON object tagged by `type`, e.g. `{"type":"CLEAR_CACHE"}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Activate an installed worker immediately.
    SkipWaiting,

    /// Delete every cache.
    ClearCache,

    /// Ask for the worker's version.
    GetVersion,

    /// Fetch URLs into the precache store.
    CacheUrls {
        /// URLs (absolute or relative to the origin).
        urls: Vec<String>,
    },
}

impl ControlMessage {
    /// Parse JSON.
    pub fn from_json(json: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(json)
    }
}
