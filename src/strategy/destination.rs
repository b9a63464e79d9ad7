use {
    serde::*,
    std::{fmt, str::*},
};

//
// Destination
//

/// Request destination.
///
/// Mirrors the values of the `Sec-Fetch-Dest` request header, which browsers derive from the
/// kind of resource being loaded.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// No destination (e.g. `fetch()` calls).
    #[default]
    Empty,

    /// Audio.
    Audio,

    /// Audio worklet.
    AudioWorklet,

    /// Document (top-level navigation).
    Document,

    /// Embed.
    Embed,

    /// Font.
    Font,

    /// Frame.
    Frame,

    /// Iframe.
    IFrame,

    /// Image.
    Image,

    /// Web app manifest.
    Manifest,

    /// Object.
    Object,

    /// Paint worklet.
    PaintWorklet,

    /// Report.
    Report,

    /// Script.
    Script,

    /// Service worker script.
    ServiceWorker,

    /// Shared worker script.
    SharedWorker,

    /// Stylesheet.
    Style,

    /// Text track.
    Track,

    /// Video.
    Video,

    /// Worker script.
    Worker,

    /// XSLT.
    Xslt,
}

impl Destination {
    /// As string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Audio => "audio",
            Self::AudioWorklet => "audioworklet",
            Self::Document => "document",
            Self::Embed => "embed",
            Self::Font => "font",
            Self::Frame => "frame",
            Self::IFrame => "iframe",
            Self::Image => "image",
            Self::Manifest => "manifest",
            Self::Object => "object",
            Self::PaintWorklet => "paintworklet",
            Self::Report => "report",
            Self::Script => "script",
            Self::ServiceWorker => "serviceworker",
            Self::SharedWorker => "sharedworker",
            Self::Style => "style",
            Self::Track => "track",
            Self::Video => "video",
            Self::Worker => "worker",
            Self::Xslt => "xslt",
        }
    }
}

impl FromStr for Destination {
    type Err = String;

    fn from_str(representation: &str) -> Result<Self, Self::Err> {
        Ok(match representation.trim().to_ascii_lowercase().as_str() {
            "" | "empty" => Self::Empty,
            "audio" => Self::Audio,
            "audioworklet" => Self::AudioWorklet,
            "document" => Self::Document,
            "embed" => Self::Embed,
            "font" => Self::Font,
            "frame" => Self::Frame,
            "iframe" => Self::IFrame,
            "image" => Self::Image,
            "manifest" => Self::Manifest,
            "object" => Self::Object,
            "paintworklet" => Self::PaintWorklet,
            "report" => Self::Report,
            "script" => Self::Script,
            "serviceworker" => Self::ServiceWorker,
            "sharedworker" => Self::SharedWorker,
            "style" => Self::Style,
            "track" => Self::Track,
            "video" => Self::Video,
            "worker" => Self::Worker,
            "xslt" => Self::Xslt,
            _ => return Err(format!("unsupported destination: {}", representation)),
        })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

//
// RequestMode
//

/// Request mode.
///
/// Mirrors the values of the `Sec-Fetch-Mode` request header.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RequestMode {
    /// CORS.
    Cors,

    /// Navigation.
    Navigate,

    /// No CORS.
    NoCors,

    /// Same origin.
    SameOrigin,

    /// WebSocket.
    WebSocket,
}

impl RequestMode {
    /// Whether this is a navigation.
    pub fn is_navigation(&self) -> bool {
        *self == Self::Navigate
    }
}

impl FromStr for RequestMode {
    type Err = String;

    fn from_str(representation: &str) -> Result<Self, Self::Err> {
        Ok(match representation.trim().to_ascii_lowercase().as_str() {
            "cors" => Self::Cors,
            "navigate" => Self::Navigate,
            "no-cors" => Self::NoCors,
            "same-origin" => Self::SameOrigin,
            "websocket" => Self::WebSocket,
            _ => return Err(format!("unsupported mode: {}", representation)),
        })
    }
}
