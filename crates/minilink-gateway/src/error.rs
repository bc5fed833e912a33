use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use minilink_core::ShortenerError;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors a handler can surface to the client.
#[derive(Debug)]
pub enum AppError {
    /// Missing or unparseable request body, or an empty link.
    BadRequest(String),
    /// Authentication required and the supplied credentials failed.
    Forbidden,
    /// Unknown short code on the redirect route.
    NotFound,
    /// The persistence layer failed; details stay in the logs.
    Store(ShortenerError),
}

impl From<ShortenerError> for AppError {
    fn from(err: ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidInput(message) => Self::BadRequest(message),
            ShortenerError::Unauthorized => Self::Forbidden,
            ShortenerError::Store(_) => Self::Store(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "User id or auth token incorrect".to_string(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "Shortened URL not found".to_string(),
            ),
            AppError::Store(err) => {
                error!(error = %err, "store failure while handling request");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage unavailable".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
