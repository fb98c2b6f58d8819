//! Core types and trait definitions for the Tally review service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends, the classifier client and the API layer all depend on
//! it.

// Native `async fn` in traits is used throughout; silence the advisory lint
// about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access_log;
pub mod category;
pub mod classification;
pub mod error;
pub mod review;
pub mod store;
pub mod trend;

pub use error::{Error, Result};
