//! HTTP surface
//!
//! Router, handlers and the error type rendered to callers.

pub mod endpoints;
pub mod error;
