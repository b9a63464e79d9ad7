mod fallback;
mod upstream;

#[allow(unused_imports)]
pub use {fallback::*, upstream::*};
