//! HTTP surface over the campus routing engine

pub mod api;
pub mod config;
pub mod error;

pub use api::{AppState, app, router};
pub use config::{ServerConfig, ServerSettings};
pub use error::{ApiError, ServerError};
