use super::super::super::strategy::*;

use {
    http::{header::*, *},
    url::Url,
};

const SEC_FETCH_DEST: HeaderName = HeaderName::from_static("sec-fetch-dest");
const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");

//
// OfflineRequest
//

/// Request properties used for routing.
pub trait OfflineRequest {
    /// Request destination.
    ///
    /// A [Destination] request extension takes precedence over the `Sec-Fetch-Dest` header.
    /// Defaults to [Destination::Empty].
    fn destination(&self) -> Destination;

    /// Request mode, if known.
    ///
    /// A [RequestMode] request extension takes precedence over the `Sec-Fetch-Mode` header.
    fn mode(&self) -> Option<RequestMode>;

    /// Whether this is a navigation (full page load).
    ///
    /// Without a known mode we fall back to checking for a `GET` that accepts `text/html`.
    fn is_navigation(&self) -> bool;

    /// Whether the request URI belongs to the origin.
    ///
    /// Origin-form (relative) URIs are always same-origin.
    fn is_same_origin(&self, origin: &Url) -> bool;
}

impl<RequestBodyT> OfflineRequest for Request<RequestBodyT> {
    fn destination(&self) -> Destination {
        if let Some(destination) = self.extensions().get::<Destination>() {
            return *destination;
        }

        self.headers()
            .get(SEC_FETCH_DEST)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn mode(&self) -> Option<RequestMode> {
        if let Some(mode) = self.extensions().get::<RequestMode>() {
            return Some(*mode);
        }

        self.headers()
            .get(SEC_FETCH_MODE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    }

    fn is_navigation(&self) -> bool {
        match self.mode() {
            Some(mode) => mode.is_navigation(),

            None => {
                self.method() == Method::GET
                    && self
                        .headers()
                        .get_all(ACCEPT)
                        .iter()
                        .filter_map(|value| value.to_str().ok())
                        .any(|value| value.contains("text/html"))
            }
        }
    }

    fn is_same_origin(&self, origin: &Url) -> bool {
        let uri = self.uri();
        if uri.scheme().is_none() && uri.authority().is_none() {
            return true;
        }

        match Url::parse(&uri.to_string()) {
            Ok(url) => url.origin() == origin.origin(),

            Err(error) => {
                tracing::debug!("unparsable URI {}: {}", uri, error);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://app.kibray.example").unwrap()
    }

    #[test]
    fn destination_from_header() {
        let request = Request::get("/static/img/logo.png")
            .header("Sec-Fetch-Dest", "image")
            .body(())
            .unwrap();
        assert_eq!(request.destination(), Destination::Image);

        let request = Request::get("/api/v1/projects/").body(()).unwrap();
        assert_eq!(request.destination(), Destination::Empty);
    }

    #[test]
    fn destination_from_extension() {
        let mut request = Request::get("/static/fonts/inter.woff2")
            .header("Sec-Fetch-Dest", "empty")
            .body(())
            .unwrap();
        request.extensions_mut().insert(Destination::Font);
        assert_eq!(request.destination(), Destination::Font);
    }

    #[test]
    fn navigation() {
        let request = Request::get("/dashboard/")
            .header("Sec-Fetch-Mode", "navigate")
            .body(())
            .unwrap();
        assert!(request.is_navigation());

        let request = Request::get("/dashboard/")
            .header("Sec-Fetch-Mode", "cors")
            .header(ACCEPT, "text/html")
            .body(())
            .unwrap();
        assert!(!request.is_navigation());

        let request = Request::get("/dashboard/")
            .header(ACCEPT, "text/html,application/xhtml+xml")
            .body(())
            .unwrap();
        assert!(request.is_navigation());

        let request = Request::post("/dashboard/")
            .header(ACCEPT, "text/html")
            .body(())
            .unwrap();
        assert!(!request.is_navigation());
    }

    #[test]
    fn same_origin() {
        let request = Request::get("/api/v1/projects/").body(()).unwrap();
        assert!(request.is_same_origin(&origin()));

        let request = Request::get("https://app.kibray.example/static/css/main.css")
            .body(())
            .unwrap();
        assert!(request.is_same_origin(&origin()));

        let request = Request::get("https://cdn.example.com/lib.js").body(()).unwrap();
        assert!(!request.is_same_origin(&origin()));

        let request = Request::get("http://app.kibray.example/").body(()).unwrap();
        assert!(!request.is_same_origin(&origin()));
    }
}
