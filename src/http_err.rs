use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
pub struct ErrorRep {
    pub message: String,
}

impl ErrorRep {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub enum ApiError {
    /// The request was syntactically valid but violates a domain rule the
    /// caller can correct.
    BadRequest(ErrorRep),
    /// The requested record is missing, or belongs to another user.
    NotFound(ErrorRep),
    /// Unclassified failure. The body stays opaque; details go to the log.
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(rep) => (StatusCode::BAD_REQUEST, Json(rep)).into_response(),
            Self::NotFound(rep) => (StatusCode::NOT_FOUND, Json(rep)).into_response(),
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep::new("Internal server error.")),
            )
                .into_response(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        error!(?error, "Received error.");

        Self::InternalServerError
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;
