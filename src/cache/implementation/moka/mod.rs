mod builder;
mod cache;

#[allow(unused_imports)]
pub use {builder::*, cache::*};
