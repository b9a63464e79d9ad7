mod key;
mod request;

#[allow(unused_imports)]
pub use {key::*, request::*};
