use super::worker::*;

use {
    http::{uri::*, *},
    std::{io, time::*},
    thiserror::*,
    tower::BoxError,
};

//
// FetchError
//

/// Network fetch error.
///
/// Always recovered locally by the strategies (cache, then offline fallback), except during
/// install, where it fails the whole precache.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The network did not answer within the route's timeout.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The network service failed.
    #[error("network: {0}")]
    Network(#[source] BoxError),

    /// The response body could not be read.
    #[error("body: {0}")]
    Body(#[source] BoxError),
}

//
// InstallError
//

/// Install error.
///
/// Any of these fails the install step as a whole.
#[derive(Debug, Error)]
pub enum InstallError {
    /// A precache manifest entry is not a valid URI.
    #[error("invalid precache URL {url:?}: {source}")]
    InvalidUrl {
        /// Manifest entry.
        url: String,

        /// Cause.
        source: InvalidUri,
    },

    /// A precache manifest entry could not be fetched.
    #[error("could not fetch {url}: {source}")]
    Fetch {
        /// Manifest entry.
        url: String,

        /// Cause.
        source: FetchError,
    },

    /// A precache manifest entry answered with a non-200 status.
    #[error("unexpected status for {url}: {status}")]
    Status {
        /// Manifest entry.
        url: String,

        /// Status.
        status: StatusCode,
    },
}

//
// LifecycleError
//

/// Lifecycle error.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Install failed.
    #[error("install failed: {0}")]
    Install(#[from] InstallError),

    /// The worker is not in a state that allows the transition.
    #[error("cannot {transition} while {state}")]
    InvalidState {
        /// Attempted transition.
        transition: &'static str,

        /// Current state.
        state: LifecycleState,
    },
}

//
// ConfigurationError
//

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Could not read the configuration file.
    #[error("I/O: {0}")]
    Io(#[from] io::Error),

    /// Could not parse TOML.
    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Could not parse a duration.
    #[error("invalid duration {value:?}: {message}")]
    Duration {
        /// Duration string.
        value: String,

        /// Parser message.
        message: String,
    },

    /// Could not parse the origin.
    #[error("invalid origin: {0}")]
    Origin(#[from] url::ParseError),
}
