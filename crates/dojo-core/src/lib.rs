//! Core types and trait definitions for the Dojo academy schedule service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it. It holds the domain model, the
//! [`store::ScheduleStore`] abstraction and the schedule expansion engine.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod actor;
pub mod error;
pub mod expand;
pub mod location;
pub mod schedule;
pub mod session;
pub mod store;

pub use error::{Error, Result};
