mod cache;
mod factory;

#[allow(unused_imports)]
pub use {cache::*, factory::*};
