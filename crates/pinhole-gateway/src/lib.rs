//! HTTP gateway for the Pinhole URL shortener.
//!
//! Exposes the create, redirect and landing routes over axum and wires the
//! shortener service to its storage backend.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
