use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failures while starting the server
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to load campus: {0}")]
    Campus(#[from] campus_nav_core::Error),
    #[error("Loader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Request failures, rendered as `{ "error": ... }`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unknown building: {0}")]
    UnknownBuilding(String),
    #[error("Unknown room: {0}")]
    UnknownRoom(String),
    #[error("{0}")]
    NotFound(String),
    #[error("No route: {0}")]
    NoRoute(String),
    #[error(transparent)]
    Core(#[from] campus_nav_core::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownBuilding(_)
            | ApiError::UnknownRoom(_)
            | ApiError::NotFound(_)
            | ApiError::NoRoute(_) => StatusCode::NOT_FOUND,
            ApiError::Core(err) => {
                tracing::error!("Request failed: {err}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
