use super::key::*;

use {
    http::{uri::*, *},
    kutil::std::immutable::ByteString as ImmutableString,
    std::fmt,
};

//
// RequestCacheKey
//

/// [CacheKey] derived from the request method and the full request URL.
///
/// Headers are ignored, so two requests for the same URL map to the same entry regardless of
/// their `Accept`, `Accept-Language`, etc. The query is kept verbatim (not reordered).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RequestCacheKey {
    /// Method.
    pub method: Method,

    /// Optional scheme.
    ///
    /// Absent for origin-form (relative) request URIs.
    pub scheme: Option<Scheme>,

    /// Optional host.
    pub host: Option<ImmutableString>,

    /// Optional port.
    pub port: Option<u16>,

    /// Path.
    pub path: ImmutableString,

    /// Optional raw query.
    pub query: Option<ImmutableString>,
}

impl RequestCacheKey {
    /// Constructor.
    pub fn new(
        method: Method,
        scheme: Option<Scheme>,
        host: Option<ImmutableString>,
        port: Option<u16>,
        path: ImmutableString,
        query: Option<ImmutableString>,
    ) -> Self {
        Self {
            method,
            scheme,
            host,
            port,
            path,
            query,
        }
    }

    /// Key for a `GET` of the URI.
    pub fn get(uri: &Uri) -> Self {
        Self::for_request(&Method::GET, uri, &HeaderMap::default())
    }
}

impl CacheKey for RequestCacheKey {
    fn for_request(method: &Method, uri: &Uri, _headers: &HeaderMap) -> Self {
        let path = match uri.path() {
            "" => "/",
            path => path,
        };

        Self::new(
            method.clone(),
            uri.scheme().cloned(),
            uri.host().map(|host| host.to_ascii_lowercase().as_str().into()),
            uri.port_u16(),
            path.into(),
            uri.query().map(|query| query.into()),
        )
    }
}

impl fmt::Display for RequestCacheKey {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{} ", self.method)?;

        if let Some(scheme) = &self.scheme {
            write!(formatter, "{}://", scheme)?;
        }

        if let Some(host) = &self.host {
            formatter.write_str(AsRef::<str>::as_ref(host))?;
        }

        if let Some(port) = self.port {
            write!(formatter, ":{}", port)?;
        }

        formatter.write_str(AsRef::<str>::as_ref(&self.path))?;

        if let Some(query) = &self.query {
            write!(formatter, "?{}", AsRef::<str>::as_ref(query))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_headers() {
        let uri: Uri = "/api/v1/projects/?page=2".parse().unwrap();

        let mut headers = HeaderMap::default();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let plain = RequestCacheKey::for_request(&Method::GET, &uri, &HeaderMap::default());
        let negotiated = RequestCacheKey::for_request(&Method::GET, &uri, &headers);

        assert_eq!(plain, negotiated);
        assert_eq!(plain.to_string(), "GET /api/v1/projects/?page=2");
    }

    #[test]
    fn distinguishes_method_and_query() {
        let uri: Uri = "/api/v1/projects/?page=2".parse().unwrap();
        let other: Uri = "/api/v1/projects/?page=3".parse().unwrap();

        assert_ne!(
            RequestCacheKey::for_request(&Method::GET, &uri, &HeaderMap::default()),
            RequestCacheKey::for_request(&Method::HEAD, &uri, &HeaderMap::default())
        );
        assert_ne!(RequestCacheKey::get(&uri), RequestCacheKey::get(&other));
    }

    #[test]
    fn absolute_url() {
        let uri: Uri = "https://Kibray.example:8443/static/css/main.css".parse().unwrap();
        assert_eq!(
            RequestCacheKey::get(&uri).to_string(),
            "GET https://kibray.example:8443/static/css/main.css"
        );
    }
}
