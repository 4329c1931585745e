//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the types shared by the code generator, the storage
//! backends, the shortener service and the HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
