//! Core types and trait definitions for the tutoring directory.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! listing engine's pure parts (filter composition and paging arithmetic)
//! live here so every backend shares them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod advertisement;
pub mod error;
pub mod filter;
pub mod import;
pub mod pagination;
pub mod store;
pub mod subject;

pub use error::{Error, Result};
