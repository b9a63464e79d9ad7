use {
    serde::*,
    serde_json::{Map, Value},
};

/// Default notification title.
pub const DEFAULT_TITLE: &str = "Kibray";

/// Default notification body.
pub const DEFAULT_BODY: &str = "New notification";

/// Default notification icon.
pub const DEFAULT_ICON: &str = "/static/icons/icon-192x192.png";

/// Default notification badge.
pub const DEFAULT_BADGE: &str = "/static/icons/badge-72x72.png";

/// Default click target.
pub const DEFAULT_URL: &str = "/";

//
// NotificationDefaults
//

/// Values used for fields missing from a push payload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NotificationDefaults {
    /// Title.
    pub title: String,

    /// Body.
    pub body: String,

    /// Icon URL.
    pub icon: String,

    /// Badge URL.
    pub badge: String,

    /// Click target URL.
    pub url: String,
}

impl Default for NotificationDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            body: DEFAULT_BODY.into(),
            icon: DEFAULT_ICON.into(),
            badge: DEFAULT_BADGE.into(),
            url: DEFAULT_URL.into(),
        }
    }
}

//
// NotificationAction
//

/// Notification action button.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NotificationAction {
    /// Action identifier.
    pub action: String,

    /// Button title.
    pub title: String,

    /// Button icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

//
// NotificationData
//

/// Data attached to a notification.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NotificationData {
    /// Click target URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Anything else the sender attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

//
// PushPayload
//

/// Push payload.
///
/// All fields are optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PushPayload {
    /// Title.
    pub title: Option<String>,

    /// Body.
    pub body: Option<String>,

    /// Icon URL.
    pub icon: Option<String>,

    /// Badge URL.
    pub badge: Option<String>,

    /// Tag.
    pub tag: Option<String>,

    /// Data.
    pub data: Option<NotificationData>,

    /// Actions.
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
}

impl PushPayload {
    /// Parse a push payload.
    ///
    /// Never fails. An absent or empty payload, or a malformed JSON object, becomes the default
    /// (empty) payload. Other UTF-8 text becomes the body.
    pub fn parse(payload: Option<&[u8]>) -> Self {
        let Some(payload) = payload else {
            return Self::default();
        };

        match serde_json::from_slice(payload) {
            Ok(payload) => payload,

            Err(error) => match std::str::from_utf8(payload).map(str::trim) {
                Ok("") => Self::default(),

                Ok(text) if !text.starts_with(['{', '[']) => {
                    tracing::debug!("text push payload");
                    Self {
                        body: Some(text.into()),
                        ..Default::default()
                    }
                }

                _ => {
                    tracing::warn!("malformed push payload: {}", error);
                    Self::default()
                }
            },
        }
    }

    /// Into a [Notification], filling in missing fields from the defaults.
    pub fn into_notification(self, defaults: &NotificationDefaults) -> Notification {
        let data = self.data.unwrap_or_default();
        let url = data.url.clone().unwrap_or_else(|| defaults.url.clone());

        Notification {
            title: self.title.unwrap_or_else(|| defaults.title.clone()),
            body: self.body.unwrap_or_else(|| defaults.body.clone()),
            icon: self.icon.unwrap_or_else(|| defaults.icon.clone()),
            badge: self.badge.unwrap_or_else(|| defaults.badge.clone()),
            tag: self.tag,
            url,
            data,
            actions: self.actions,
        }
    }
}

//
// Notification
//

/// Notification to be shown by the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    /// Title.
    pub title: String,

    /// Body.
    pub body: String,

    /// Icon URL.
    pub icon: String,

    /// Badge URL.
    pub badge: String,

    /// Tag.
    pub tag: Option<String>,

    /// Click target URL.
    pub url: String,

    /// Data.
    pub data: NotificationData,

    /// Actions.
    pub actions: Vec<NotificationAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(payload: &str) -> Notification {
        PushPayload::parse(Some(payload.as_bytes())).into_notification(&NotificationDefaults::default())
    }

    #[test]
    fn full_payload() {
        let notification = parse(
            r#"{
                "title": "Daily log",
                "body": "Submitted",
                "icon": "/static/icons/log.png",
                "tag": "log-17",
                "data": {"url": "/projects/3/logs/17/", "project": 3},
                "actions": [{"action": "view", "title": "View"}, {"action": "close", "title": "Close"}]
            }"#,
        );

        assert_eq!(notification.title, "Daily log");
        assert_eq!(notification.body, "Submitted");
        assert_eq!(notification.icon, "/static/icons/log.png");
        assert_eq!(notification.badge, DEFAULT_BADGE);
        assert_eq!(notification.tag.as_deref(), Some("log-17"));
        assert_eq!(notification.url, "/projects/3/logs/17/");
        assert_eq!(notification.data.extra["project"], 3);
        assert_eq!(notification.actions.len(), 2);
    }

    #[test]
    fn missing_fields() {
        let notification = parse(r#"{"body": "Task #4 completed"}"#);
        assert_eq!(notification.title, DEFAULT_TITLE);
        assert_eq!(notification.body, "Task #4 completed");
        assert_eq!(notification.icon, DEFAULT_ICON);
        assert_eq!(notification.url, DEFAULT_URL);
    }

    #[test]
    fn degenerate_payloads() {
        let defaults = NotificationDefaults::default();

        let notification = PushPayload::parse(None).into_notification(&defaults);
        assert_eq!(notification.title, DEFAULT_TITLE);
        assert_eq!(notification.body, DEFAULT_BODY);

        let payloads: [&[u8]; 5] = [b"", b"  ", b"{\"title\": ", b"[1, 2", b"\xff\xfe"];
        for payload in payloads {
            let notification = PushPayload::parse(Some(payload)).into_notification(&defaults);
            assert_eq!(notification.title, DEFAULT_TITLE);
            assert_eq!(notification.body, DEFAULT_BODY);
        }

        let notification = parse("Server maintenance at 22:00");
        assert_eq!(notification.title, DEFAULT_TITLE);
        assert_eq!(notification.body, "Server maintenance at 22:00");
    }
}
