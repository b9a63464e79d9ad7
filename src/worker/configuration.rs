use super::super::{cache::middleware::*, error::*, notification::*, strategy::*};

use {
    serde::*,
    std::{collections::*, fs, path::*, time::*},
    url::Url,
};

/// Default origin.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Default precache prefix.
pub const DEFAULT_PREFIX: &str = "kibray";

/// Default version.
pub const DEFAULT_VERSION: &str = "v1";

/// Default offline page.
pub const DEFAULT_OFFLINE_PAGE: &str = "/offline/";

/// Default precache manifest.
pub const DEFAULT_PRECACHE: &[&str] = &[
    "/",
    "/dashboard/",
    "/static/css/main.css",
    "/static/js/main.js",
    "/static/manifest.json",
    DEFAULT_OFFLINE_PAGE,
];

//
// WorkerConfiguration
//

/// Configuration of one deployed version of the worker.
#[derive(Clone, Debug)]
pub struct WorkerConfiguration {
    /// Origin.
    ///
    /// Relative request URIs and manifest entries are resolved against it, and requests for other
    /// origins are cross-origin.
    pub origin: Url,

    /// Precache name prefix.
    pub prefix: String,

    /// Version.
    pub version: String,

    /// Precache manifest.
    pub precache: Vec<String>,

    /// Offline page.
    ///
    /// Always precached.
    pub offline_page: String,

    /// Routes.
    pub routes: RouteTable,

    /// Caching.
    pub caching: CachingConfiguration,

    /// Notification defaults.
    pub notifications: NotificationDefaults,
}

impl WorkerConfiguration {
    /// Name of the precache store, e.g. `kibray-v1`.
    pub fn precache_name(&self) -> String {
        format!("{}-{}", self.prefix, self.version)
    }

    /// Names of the caches belonging to this version.
    ///
    /// Activation deletes all other caches.
    pub fn cache_names(&self) -> BTreeSet<String> {
        let mut names = self.routes.cache_names();
        names.insert(self.precache_name());
        names
    }

    /// Precache manifest, including the offline page, without duplicates.
    pub fn precache_manifest(&self) -> Vec<String> {
        let mut manifest = Vec::with_capacity(self.precache.len() + 1);
        for url in self.precache.iter().chain([&self.offline_page]) {
            if !manifest.contains(url) {
                manifest.push(url.clone());
            }
        }
        manifest
    }

    /// Set origin.
    pub fn origin(mut self, origin: Url) -> Self {
        self.origin = origin;
        self
    }

    /// Set precache name prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set precache manifest.
    pub fn precache<IteratorT>(mut self, precache: IteratorT) -> Self
    where
        IteratorT: IntoIterator,
        IteratorT::Item: Into<String>,
    {
        self.precache = precache.into_iter().map(Into::into).collect();
        self
    }

    /// Set offline page.
    pub fn offline_page(mut self, offline_page: impl Into<String>) -> Self {
        self.offline_page = offline_page.into();
        self
    }

    /// Set routes.
    pub fn routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Set caching configuration.
    pub fn caching(mut self, caching: CachingConfiguration) -> Self {
        self.caching = caching;
        self
    }

    /// Set notification defaults.
    pub fn notifications(mut self, notifications: NotificationDefaults) -> Self {
        self.notifications = notifications;
        self
    }

    /// Parse TOML.
    ///
    /// Missing keys keep their defaults. A `routes` array replaces the whole route table.
    pub fn from_toml_str(representation: &str) -> Result<Self, ConfigurationError> {
        toml::from_str::<ConfigurationDefinition>(representation)?.into_configuration()
    }

    /// Read a TOML file.
    pub fn from_toml_file<PathT>(path: PathT) -> Result<Self, ConfigurationError>
    where
        PathT: AsRef<Path>,
    {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}

impl Default for WorkerConfiguration {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            prefix: DEFAULT_PREFIX.into(),
            version: DEFAULT_VERSION.into(),
            precache: DEFAULT_PRECACHE.iter().map(|url| (*url).into()).collect(),
            offline_page: DEFAULT_OFFLINE_PAGE.into(),
            routes: RouteTable::application(),
            caching: Default::default(),
            notifications: Default::default(),
        }
    }
}

fn default_origin() -> Url {
    Url::parse(DEFAULT_ORIGIN).expect("valid default origin")
}

//
// ConfigurationDefinition
//

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct ConfigurationDefinition {
    origin: Option<String>,
    prefix: Option<String>,
    version: Option<String>,
    precache: Option<Vec<String>>,
    offline_page: Option<String>,
    routes: Option<Vec<RouteDefinition>>,
    caching: CachingDefinition,
    notifications: Option<NotificationDefaults>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct CachingDefinition {
    max_body_size: Option<usize>,
    cacheable_by_default: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RouteDefinition {
    #[serde(rename = "match")]
    matcher: RouteMatcher,
    strategy: ActionDefinition,
    cache: Option<String>,
    max_entries: Option<usize>,
    max_age: Option<String>,
    network_timeout: Option<String>,
    #[serde(default)]
    fallback: OfflineFallback,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ActionDefinition {
    Bypass,
    NetworkFirst,
    CacheFirst,
    StaleWhileRevalidate,
}

impl ConfigurationDefinition {
    fn into_configuration(self) -> Result<WorkerConfiguration, ConfigurationError> {
        let mut configuration = WorkerConfiguration::default();

        if let Some(origin) = self.origin {
            configuration.origin = Url::parse(&origin)?;
        }

        if let Some(prefix) = self.prefix {
            configuration.prefix = prefix;
        }

        if let Some(version) = self.version {
            configuration.version = version;
        }

        if let Some(precache) = self.precache {
            configuration.precache = precache;
        }

        if let Some(offline_page) = self.offline_page {
            configuration.offline_page = offline_page;
        }

        if let Some(routes) = self.routes {
            configuration.routes = RouteTable::new(
                routes
                    .into_iter()
                    .map(RouteDefinition::into_route)
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }

        if let Some(max_body_size) = self.caching.max_body_size {
            configuration.caching.max_body_size = max_body_size;
        }

        if let Some(cacheable_by_default) = self.caching.cacheable_by_default {
            configuration.caching.cacheable_by_default = cacheable_by_default;
        }

        if let Some(notifications) = self.notifications {
            configuration.notifications = notifications;
        }

        Ok(configuration)
    }
}

impl RouteDefinition {
    fn into_route(self) -> Result<Route, ConfigurationError> {
        let kind = match self.strategy {
            ActionDefinition::Bypass => return Ok(Route::new(self.matcher, RouteAction::Bypass)),
            ActionDefinition::NetworkFirst => StrategyKind::NetworkFirst,
            ActionDefinition::CacheFirst => StrategyKind::CacheFirst,
            ActionDefinition::StaleWhileRevalidate => StrategyKind::StaleWhileRevalidate,
        };

        let mut strategy = Strategy::new(kind).fallback(self.fallback);

        if let Some(cache) = self.cache {
            strategy = strategy.cache_name(cache);
        }

        if let Some(max_entries) = self.max_entries {
            strategy = strategy.max_entries(max_entries);
        }

        if let Some(max_age) = self.max_age {
            strategy = strategy.max_age(parse_duration(max_age)?);
        }

        if let Some(network_timeout) = self.network_timeout {
            strategy = strategy.network_timeout(parse_duration(network_timeout)?);
        }

        Ok(Route::new(self.matcher, RouteAction::Strategy(strategy)))
    }
}

fn parse_duration(value: String) -> Result<Duration, ConfigurationError> {
    duration_str::parse(&value).map_err(|message| ConfigurationError::Duration {
        value,
        message: message.to_string(),
    })
}
