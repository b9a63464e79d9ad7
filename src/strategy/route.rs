use super::{super::cache::middleware::*, destination::*, strategy::*};

use {
    http::*,
    serde::*,
    std::{collections::*, time::*},
    url::Url,
};

/// Path prefix of the backend REST API.
pub const API_PATH_PREFIX: &str = "/api/";

/// Runtime cache for API responses.
pub const API_CACHE: &str = "api-cache";

/// Runtime cache for images.
pub const IMAGES_CACHE: &str = "images-cache";

/// Runtime cache for stylesheets and scripts.
pub const STATIC_RESOURCES_CACHE: &str = "static-resources";

/// Runtime cache for fonts.
pub const FONTS_CACHE: &str = "fonts-cache";

/// Runtime cache for pages.
pub const PAGES_CACHE: &str = "pages-cache";

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

//
// RouteMatcher
//

/// Route predicate.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteMatcher {
    /// The request URL is not of our origin.
    CrossOrigin,

    /// The request path starts with one of the prefixes.
    PathPrefix(Vec<String>),

    /// The request destination is one of these.
    Destination(Vec<Destination>),

    /// The request is a navigation.
    Navigation,

    /// Any request.
    Any,
}

impl RouteMatcher {
    /// Whether the request matches.
    pub fn matches<RequestBodyT>(&self, request: &Request<RequestBodyT>, origin: &Url) -> bool {
        match self {
            Self::CrossOrigin => !request.is_same_origin(origin),

            Self::PathPrefix(prefixes) => {
                let path = request.uri().path();
                prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
            }

            Self::Destination(destinations) => destinations.contains(&request.destination()),

            Self::Navigation => request.is_navigation(),

            Self::Any => true,
        }
    }
}

//
// RouteAction
//

/// What to do with a matched request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteAction {
    /// Pass through to the network without caching.
    Bypass,

    /// Apply a strategy.
    Strategy(Strategy),
}

//
// Route
//

/// Route.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Route {
    /// Matcher.
    pub matcher: RouteMatcher,

    /// Action.
    pub action: RouteAction,
}

impl Route {
    /// Constructor.
    pub fn new(matcher: RouteMatcher, action: RouteAction) -> Self {
        Self { matcher, action }
    }
}

//
// RouteTable
//

/// Declarative route table.
///
/// Routes are evaluated in order and the first match wins. A request that matches no route is
/// bypassed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteTable {
    /// Routes.
    pub routes: Vec<Route>,
}

impl RouteTable {
    /// Constructor.
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Add a route.
    pub fn route(mut self, matcher: RouteMatcher, action: RouteAction) -> Self {
        self.routes.push(Route::new(matcher, action));
        self
    }

    /// Add a route with a strategy.
    pub fn strategy(self, matcher: RouteMatcher, strategy: Strategy) -> Self {
        self.route(matcher, RouteAction::Strategy(strategy))
    }

    /// Select the action for a request.
    ///
    /// [None] means that no route matched.
    pub fn select<RequestBodyT>(&self, request: &Request<RequestBodyT>, origin: &Url) -> Option<&RouteAction> {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(request, origin))
            .map(|route| &route.action)
    }

    /// Names of the caches used by the routes.
    ///
    /// Does not include the precache store.
    pub fn cache_names(&self) -> BTreeSet<String> {
        self.routes
            .iter()
            .filter_map(|route| match &route.action {
                RouteAction::Strategy(strategy) => strategy.cache_name.clone(),
                RouteAction::Bypass => None,
            })
            .collect()
    }

    /// The application's route table.
    ///
    /// 1. Cross-origin: bypass.
    /// 2. API: network first with a short timeout and a small, short-lived cache.
    /// 3. Images: cache first with a large, long-lived cache.
    /// 4. Stylesheets and scripts: stale while revalidate.
    /// 5. Fonts: cache first with a very long-lived cache.
    /// 6. Navigations: network first with the offline page as fallback.
    /// 7. Everything else: network first on the precache store.
    pub fn application() -> Self {
        Self::default()
            .route(RouteMatcher::CrossOrigin, RouteAction::Bypass)
            .strategy(
                RouteMatcher::PathPrefix(vec![API_PATH_PREFIX.into()]),
                Strategy::network_first()
                    .cache_name(API_CACHE)
                    .max_entries(50)
                    .max_age(HOUR)
                    .network_timeout(Duration::from_secs(10)),
            )
            .strategy(
                RouteMatcher::Destination(vec![Destination::Image]),
                Strategy::cache_first()
                    .cache_name(IMAGES_CACHE)
                    .max_entries(100)
                    .max_age(30 * DAY),
            )
            .strategy(
                RouteMatcher::Destination(vec![Destination::Style, Destination::Script]),
                Strategy::stale_while_revalidate().cache_name(STATIC_RESOURCES_CACHE),
            )
            .strategy(
                RouteMatcher::Destination(vec![Destination::Font]),
                Strategy::cache_first()
                    .cache_name(FONTS_CACHE)
                    .max_entries(30)
                    .max_age(365 * DAY),
            )
            .strategy(
                RouteMatcher::Navigation,
                Strategy::network_first()
                    .cache_name(PAGES_CACHE)
                    .network_timeout(Duration::from_secs(10))
                    .fallback(OfflineFallback::OfflinePage),
            )
            .strategy(RouteMatcher::Any, Strategy::network_first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://app.kibray.example").unwrap()
    }

    fn select(request: Request<()>) -> RouteAction {
        RouteTable::application()
            .select(&request, &origin())
            .cloned()
            .expect("route")
    }

    fn kind_and_cache(action: RouteAction) -> (StrategyKind, Option<String>) {
        match action {
            RouteAction::Strategy(strategy) => (strategy.kind, strategy.cache_name),
            RouteAction::Bypass => panic!("bypass"),
        }
    }

    #[test]
    fn cross_origin_wins() {
        // Even an API-looking image on another origin is bypassed
        let request = Request::get("https://cdn.example.com/api/logo.png")
            .header("Sec-Fetch-Dest", "image")
            .body(())
            .unwrap();
        assert_eq!(select(request), RouteAction::Bypass);
    }

    #[test]
    fn api() {
        let request = Request::get("/api/v1/projects/").body(()).unwrap();
        let RouteAction::Strategy(strategy) = select(request) else {
            panic!("bypass");
        };
        assert_eq!(strategy.kind, StrategyKind::NetworkFirst);
        assert_eq!(strategy.cache_name.as_deref(), Some(API_CACHE));
        assert_eq!(strategy.bounds.max_entries, Some(50));
        assert_eq!(strategy.bounds.max_age, Some(HOUR));
        assert_eq!(strategy.network_timeout, Some(Duration::from_secs(10)));

        // API precedes navigation
        let request = Request::get("/api/v1/tasks/")
            .header("Sec-Fetch-Mode", "navigate")
            .body(())
            .unwrap();
        assert_eq!(kind_and_cache(select(request)).1.as_deref(), Some(API_CACHE));
    }

    #[test]
    fn destinations() {
        let request = Request::get("/media/photo.jpg")
            .header("Sec-Fetch-Dest", "image")
            .body(())
            .unwrap();
        assert_eq!(
            kind_and_cache(select(request)),
            (StrategyKind::CacheFirst, Some(IMAGES_CACHE.into()))
        );

        for destination in ["style", "script"] {
            let request = Request::get("/static/bundle")
                .header("Sec-Fetch-Dest", destination)
                .body(())
                .unwrap();
            assert_eq!(
                kind_and_cache(select(request)),
                (StrategyKind::StaleWhileRevalidate, Some(STATIC_RESOURCES_CACHE.into()))
            );
        }

        let request = Request::get("/static/fonts/inter.woff2")
            .header("Sec-Fetch-Dest", "font")
            .body(())
            .unwrap();
        assert_eq!(
            kind_and_cache(select(request)),
            (StrategyKind::CacheFirst, Some(FONTS_CACHE.into()))
        );
    }

    #[test]
    fn navigation_and_fallthrough() {
        let request = Request::get("/dashboard/")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Dest", "document")
            .body(())
            .unwrap();
        let RouteAction::Strategy(strategy) = select(request) else {
            panic!("bypass");
        };
        assert_eq!(strategy.kind, StrategyKind::NetworkFirst);
        assert_eq!(strategy.fallback, OfflineFallback::OfflinePage);

        let request = Request::get("/static/manifest.json")
            .header("Sec-Fetch-Dest", "manifest")
            .body(())
            .unwrap();
        let RouteAction::Strategy(strategy) = select(request) else {
            panic!("bypass");
        };
        assert_eq!(strategy.kind, StrategyKind::NetworkFirst);
        assert_eq!(strategy.cache_name, None);
        assert_eq!(strategy.fallback, OfflineFallback::ServiceUnavailable);
    }

    #[test]
    fn empty_table_matches_nothing() {
        let request = Request::get("/").body(()).unwrap();
        assert!(RouteTable::default().select(&request, &origin()).is_none());
    }

    #[test]
    fn cache_names() {
        let names = RouteTable::application().cache_names();
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec![API_CACHE, FONTS_CACHE, IMAGES_CACHE, PAGES_CACHE, STATIC_RESOURCES_CACHE]
        );
    }
}
