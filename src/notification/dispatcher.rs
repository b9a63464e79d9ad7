use super::payload::*;

use {serde::*, url::Url};

/// Notification actions that only close the notification.
pub const DISMISS_ACTIONS: &[&str] = &["close", "dismiss"];

//
// ClientWindow
//

/// Open client window, as reported by the host.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClientWindow {
    /// Host-assigned identifier.
    pub id: String,

    /// Current URL.
    pub url: Url,

    /// Whether it has focus.
    #[serde(default)]
    pub focused: bool,
}

impl ClientWindow {
    /// Constructor.
    pub fn new(id: impl Into<String>, url: Url) -> Self {
        Self {
            id: id.into(),
            url,
            focused: false,
        }
    }
}

//
// NotificationClick
//

/// Notification click.
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationClick {
    /// The clicked notification.
    pub notification: Notification,

    /// The clicked action button, if any.
    pub action: Option<String>,

    /// Currently open client windows.
    pub clients: Vec<ClientWindow>,
}

impl NotificationClick {
    /// Constructor.
    pub fn new(notification: Notification, action: Option<String>, clients: Vec<ClientWindow>) -> Self {
        Self {
            notification,
            action,
            clients,
        }
    }
}

//
// ClickAction
//

/// What the host should do after a notification click.
///
/// The notification is closed in every case.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClickAction {
    /// Nothing beyond closing.
    Dismiss,

    /// Focus an open window.
    Focus {
        /// Window identifier.
        client_id: String,
    },

    /// Open a new window.
    OpenWindow {
        /// URL.
        url: Url,
    },
}

//
// NotificationDispatcher
//

/// Notification dispatcher.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    /// Defaults.
    pub defaults: NotificationDefaults,

    /// Origin against which relative target URLs are resolved.
    pub origin: Url,
}

impl NotificationDispatcher {
    /// Constructor.
    pub fn new(defaults: NotificationDefaults, origin: Url) -> Self {
        Self { defaults, origin }
    }

    /// The notification to show for a push payload.
    pub fn display(&self, payload: Option<&[u8]>) -> Notification {
        let notification = PushPayload::parse(payload).into_notification(&self.defaults);
        tracing::debug!("push: {}", notification.title);
        notification
    }

    /// Route a notification click.
    ///
    /// Focuses an open window already at the target URL (preferring one that has focus), otherwise
    /// opens a new one.
    pub fn route_click(&self, click: &NotificationClick) -> ClickAction {
        if let Some(action) = &click.action
            && DISMISS_ACTIONS.contains(&action.as_str())
        {
            tracing::debug!("click: dismiss");
            return ClickAction::Dismiss;
        }

        let target = self.resolve(&click.notification.url);

        let matching: Vec<_> = click
            .clients
            .iter()
            .filter(|client| same_document(&client.url, &target))
            .collect();

        match matching.iter().find(|client| client.focused).or(matching.first()) {
            Some(client) => {
                tracing::debug!("click: focus {}", client.id);
                ClickAction::Focus {
                    client_id: client.id.clone(),
                }
            }

            None => {
                tracing::debug!("click: open {}", target);
                ClickAction::OpenWindow { url: target }
            }
        }
    }

    fn resolve(&self, url: &str) -> Url {
        match self.origin.join(url) {
            Ok(url) => url,

            Err(error) => {
                tracing::warn!("invalid notification URL {:?}: {}", url, error);
                self.origin.join(&self.defaults.url).unwrap_or_else(|_| self.origin.clone())
            }
        }
    }
}

// Equal but for the fragment.
fn same_document(left: &Url, right: &Url) -> bool {
    left[..url::Position::AfterQuery] == right[..url::Position::AfterQuery]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> NotificationDispatcher {
        NotificationDispatcher::new(
            NotificationDefaults::default(),
            Url::parse("https://app.kibray.example").unwrap(),
        )
    }

    fn window(id: &str, url: &str) -> ClientWindow {
        ClientWindow::new(id, Url::parse(url).unwrap())
    }

    #[test]
    fn focus_existing_window() {
        let dispatcher = dispatcher();
        let notification = dispatcher.display(Some(br#"{"title":"Task Update","data":{"url":"/tasks/4/"}}"#));

        let click = NotificationClick::new(
            notification,
            None,
            vec![
                window("a", "https://app.kibray.example/dashboard/"),
                window("b", "https://app.kibray.example/tasks/4/#comments"),
            ],
        );

        assert_eq!(
            dispatcher.route_click(&click),
            ClickAction::Focus { client_id: "b".into() }
        );
    }

    #[test]
    fn prefer_focused_window() {
        let dispatcher = dispatcher();
        let notification = dispatcher.display(Some(br#"{"data":{"url":"/tasks/4/"}}"#));

        let mut focused = window("b", "https://app.kibray.example/tasks/4/");
        focused.focused = true;

        let click = NotificationClick::new(
            notification,
            None,
            vec![window("a", "https://app.kibray.example/tasks/4/"), focused],
        );

        assert_eq!(
            dispatcher.route_click(&click),
            ClickAction::Focus { client_id: "b".into() }
        );
    }

    #[test]
    fn task_update() {
        let notification = dispatcher().display(Some(br#"{"title":"Task Update","body":"Task #4 completed"}"#));

        assert_eq!(notification.title, "Task Update");
        assert_eq!(notification.body, "Task #4 completed");
        assert_eq!(notification.url, DEFAULT_URL);
    }

    #[test]
    fn open_new_window() {
        let dispatcher = dispatcher();
        let notification = dispatcher.display(None);

        let click = NotificationClick::new(
            notification,
            Some("view".into()),
            vec![window("a", "https://app.kibray.example/dashboard/")],
        );

        assert_eq!(
            dispatcher.route_click(&click),
            ClickAction::OpenWindow {
                url: Url::parse("https://app.kibray.example/").unwrap()
            }
        );
    }

    #[test]
    fn dismiss() {
        let dispatcher = dispatcher();
        let notification = dispatcher.display(None);

        for action in DISMISS_ACTIONS {
            let click = NotificationClick::new(notification.clone(), Some((*action).into()), Vec::default());
            assert_eq!(dispatcher.route_click(&click), ClickAction::Dismiss);
        }
    }
}
