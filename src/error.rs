//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Failure classes surfaced to clients. Every route reports failures through one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    UpstreamUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::Internal => "internal_error",
        }
    }
}

/// Implemented by layer errors that can be reported through an [`ErrorKind`].
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    /// A failed route. `message` is the fixed text for that route; the cause is only logged.
    #[error("{message}")]
    Route {
        kind: ErrorKind,
        message: &'static str,
    },
}

impl AppError {
    pub fn route(kind: ErrorKind, message: &'static str) -> Self {
        AppError::Route { kind, message }
    }

    /// Request-body rejection that keeps 413 apart from other malformed bodies.
    pub fn from_body_rejection(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(text)
        } else {
            AppError::BadRequest(text)
        }
    }
}

/// Turns a layer error into the route's static failure, logging the underlying cause.
pub trait RouteResultExt<T> {
    fn or_route(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E> RouteResultExt<T> for Result<T, E>
where
    E: Classify + Display,
{
    fn or_route(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let kind = e.kind();
            match kind {
                ErrorKind::NotFound | ErrorKind::Conflict => {
                    tracing::info!(error = %e, code = kind.code(), "{}", message)
                }
                _ => tracing::error!(error = %e, code = kind.code(), "{}", message),
            }
            AppError::route(kind, message)
        })
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg),
            AppError::Route { kind, message } => (kind.status(), kind.code(), message.to_string()),
        };
        (status, Json(ErrorBody { error, code })).into_response()
    }
}
