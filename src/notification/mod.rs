mod dispatcher;
mod payload;

#[allow(unused_imports)]
pub use {dispatcher::*, payload::*};
