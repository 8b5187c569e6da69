use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Terminal rejection of an inbound request.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A credential was presented but failed verification. Never falls
    /// through to the compatibility path.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// No credential and no compatibility marker presented.
    #[error("not authenticated")]
    Unauthenticated,

    /// Missing or invalid gate configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidCredential(_) | Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::Config(_) => {
                tracing::error!(error = %self, "gate internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<crate::error::Error> for GateError {
    fn from(e: crate::error::Error) -> Self {
        match e {
            crate::error::Error::InvalidCredential(reason) => Self::InvalidCredential(reason),
            crate::error::Error::Config(reason) => Self::Config(reason),
        }
    }
}
