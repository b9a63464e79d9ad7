mod body;
mod bounds;
mod cache;
mod key;
mod response;
mod storage;

/// Cache implementations.
pub mod implementation;

/// Cache middleware utilities.
pub mod middleware;

#[allow(unused_imports)]
pub use {body::*, bounds::*, cache::*, key::*, response::*, storage::*};
