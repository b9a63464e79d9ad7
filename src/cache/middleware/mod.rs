mod configuration;
mod hooks;
mod request;
mod responses;

#[allow(unused_imports)]
pub use {configuration::*, hooks::*, request::*, responses::*};
