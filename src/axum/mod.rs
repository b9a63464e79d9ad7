mod handlers;
mod headers;

#[allow(unused_imports)]
pub use {handlers::*, headers::*};
