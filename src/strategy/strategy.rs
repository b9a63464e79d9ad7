use super::super::cache::*;

use {
    duration_str::*,
    serde::*,
    std::{fmt, time::*},
};

//
// StrategyKind
//

/// Caching strategy.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Try the network first, falling back to the cache on failure or timeout.
    NetworkFirst,

    /// Try the cache first, consulting the network only on a miss.
    CacheFirst,

    /// Serve from the cache immediately while refreshing it in the background. Waits on the
    /// network only on a miss.
    StaleWhileRevalidate,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(match self {
            Self::NetworkFirst => "network-first",
            Self::CacheFirst => "cache-first",
            Self::StaleWhileRevalidate => "stale-while-revalidate",
        })
    }
}

//
// OfflineFallback
//

/// What to serve when neither the network nor a cache can answer.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfflineFallback {
    /// Synthesized 503 (Service Unavailable) with a plain-text body.
    #[default]
    ServiceUnavailable,

    /// The precached offline page (or the 503 if it is missing).
    OfflinePage,
}

//
// Strategy
//

/// Caching strategy with its configuration.
///
/// Stateless beyond its configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Strategy {
    /// Kind.
    pub kind: StrategyKind,

    /// Cache name.
    ///
    /// [None] means the worker's precache store.
    pub cache_name: Option<String>,

    /// Bounds applied when the cache is created.
    pub bounds: CacheBounds,

    /// Network timeout.
    ///
    /// Only used by [NetworkFirst](StrategyKind::NetworkFirst).
    pub network_timeout: Option<Duration>,

    /// Offline fallback.
    pub fallback: OfflineFallback,
}

impl Strategy {
    /// Constructor.
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            cache_name: None,
            bounds: CacheBounds::unbounded(),
            network_timeout: None,
            fallback: OfflineFallback::default(),
        }
    }

    /// [NetworkFirst](StrategyKind::NetworkFirst).
    pub fn network_first() -> Self {
        Self::new(StrategyKind::NetworkFirst)
    }

    /// [CacheFirst](StrategyKind::CacheFirst).
    pub fn cache_first() -> Self {
        Self::new(StrategyKind::CacheFirst)
    }

    /// [StaleWhileRevalidate](StrategyKind::StaleWhileRevalidate).
    pub fn stale_while_revalidate() -> Self {
        Self::new(StrategyKind::StaleWhileRevalidate)
    }

    /// Set cache name.
    pub fn cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = Some(cache_name.into());
        self
    }

    /// Set maximum number of entries.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.bounds.max_entries = Some(max_entries);
        self
    }

    /// Set maximum entry age.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.bounds.max_age = Some(max_age);
        self
    }

    /// Set network timeout.
    pub fn network_timeout(mut self, network_timeout: Duration) -> Self {
        self.network_timeout = Some(network_timeout);
        self
    }

    /// Set offline fallback.
    pub fn fallback(mut self, fallback: OfflineFallback) -> Self {
        self.fallback = fallback;
        self
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.kind)?;

        if let Some(cache_name) = &self.cache_name {
            write!(formatter, " in {}", cache_name)?;
        }

        if let Some(max_entries) = self.bounds.max_entries {
            write!(formatter, " (max {} entries)", max_entries)?;
        }

        if let Some(max_age) = self.bounds.max_age {
            write!(formatter, " (max age {})", max_age.human_format())?;
        }

        if let Some(network_timeout) = self.network_timeout {
            write!(formatter, " (timeout {})", network_timeout.human_format())?;
        }

        Ok(())
    }
}
