//! URL shortener service implementation.
//!
//! This crate composes a [`Generator`](pinhole_generator::Generator) with a
//! [`Repository`](pinhole_core::Repository). Core types are re-exported from
//! `pinhole_core`.

pub mod service;

pub use pinhole_core::{ShortCode, Shortener, ShortenerError};
pub use service::ShortenerService;
