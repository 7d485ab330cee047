//! Request-level error type.
//!
//! Handlers return `Result<T, ServerError>`; the `IntoResponse` impl picks
//! the status code and a JSON `{ "error": ... }` body. Storage and inference
//! details are logged, not echoed to the client.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use testmate_core::TestmateError;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] TestmateError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => "expected an application/json body",
            JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
            _ => "request body does not have the expected fields",
        };
        ServerError::BadRequest(message.to_owned())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected query string");
        ServerError::BadRequest("invalid query string".to_owned())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Core(e) => match e {
                TestmateError::InvalidUseCase(_) | TestmateError::InvalidConversation(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                TestmateError::AuthenticationUnavailable(_) => {
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                TestmateError::Busy => (StatusCode::CONFLICT, e.to_string()),
                TestmateError::EmptyInferenceResult => (StatusCode::BAD_GATEWAY, e.to_string()),
                TestmateError::InferenceService(_) => {
                    error!(error = %e, "inference service error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "inference service error".to_owned(),
                    )
                }
                TestmateError::StorageUnavailable(_) => {
                    error!(error = %e, "storage error");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "storage unavailable".to_owned(),
                    )
                }
                _ => {
                    error!(error = %e, "internal server error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_owned(),
                    )
                }
            },
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}
