use {
    ::axum::{
        http::header::*,
        response::{IntoResponse, Response},
    },
    kutil::http::*,
};

//
// Headers
//

/// Headers.
pub trait Headers<IntoResponseT>
where
    Self: Sized,
    IntoResponseT: IntoResponse,
{
    /// Set `XX-Cache` header to "false".
    ///
    /// The offline worker will serve the response but never store it.
    fn do_not_cache(self) -> Response {
        self.set_header_bool(XX_CACHE, false)
    }

    /// Set `XX-Cache` header to "true".
    ///
    /// Needed when caching is configured as opt-in, see
    /// [cacheable_by_default](crate::cache::middleware::CachingConfiguration::cacheable_by_default).
    fn cacheable(self) -> Response {
        self.set_header_bool(XX_CACHE, true)
    }

    /// Set a header to a boolean value.
    fn set_header_bool(self, name: HeaderName, value: bool) -> Response;
}

impl<IntoResponseT> Headers<IntoResponseT> for IntoResponseT
where
    IntoResponseT: IntoResponse,
{
    fn set_header_bool(self, name: HeaderName, value: bool) -> Response {
        let mut response = self.into_response();
        response.headers_mut().set_bool_value(name, value);
        response
    }
}
