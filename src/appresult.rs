use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::validation::{FieldError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

/// Every handler failure. Internal errors carry the message shown to the
/// client separately from the cause, which is only logged.
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    NotFound(&'static str),
    Timeout,
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => {
                tracing::debug!(%err, "rejected request");
                let body = ErrorBody {
                    message: &err.message,
                    errors: (!err.errors.is_empty()).then_some(err.errors.as_slice()),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { message, errors: None })).into_response()
            }
            AppError::Timeout => {
                let body = ErrorBody {
                    message: "Request timed out",
                    errors: None,
                };
                (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
            }
            AppError::Internal { message, source } => {
                tracing::error!(error = ?source, "{message}");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { message, errors: None })).into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal {
            message: "Internal server error",
            source: err.into(),
        }
    }
}

/// `TimeoutLayer` answers with a bare 408; give it the usual error body.
pub async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("request timed out");
        AppError::Timeout.into_response()
    } else {
        response
    }
}

impl AppError {
    pub fn validation(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Attaches the client-facing message to an internal failure.
pub trait OrInternal<T> {
    fn or_internal(self, message: &'static str) -> AppResult<T>;
}

impl<T, E> OrInternal<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_internal(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| AppError::Internal {
            message,
            source: err.into(),
        })
    }
}
