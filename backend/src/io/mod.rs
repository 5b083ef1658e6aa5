//! # IO Module
//!
//! The HTTP boundary: axum handlers, the JSON envelope, and translation of
//! domain errors into status codes.

pub mod rest;

pub use rest::*;
