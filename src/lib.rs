// https://stackoverflow.com/a/61417700
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod error;
mod layer;
mod service;

/// Axum utilities.
#[cfg(feature = "axum")]
pub mod axum;

/// Cache.
pub mod cache;

/// Push notifications.
pub mod notification;

/// Caching strategies and routing.
pub mod strategy;

/// Offline worker.
pub mod worker;

pub use {error::*, layer::*, service::*};
