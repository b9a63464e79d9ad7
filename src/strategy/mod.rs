mod destination;
mod route;
mod strategy;

#[allow(unused_imports)]
pub use {destination::*, route::*, strategy::*};
