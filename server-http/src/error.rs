use crate::models::{ErrorResponse, FieldError, ValidationErrorResponse};
use crate::validation::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub const NOT_FOUND_MESSAGE: &str = "No receipt found for that ID";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON format";

/// Error returned by receipt handlers
#[derive(Debug)]
pub enum ApiError {
    Status(StatusCode, String),
    Validation(Vec<ValidationError>),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::Status(StatusCode::BAD_REQUEST, message.into())
    }
}

impl From<shared::Error> for ApiError {
    fn from(err: shared::Error) -> Self {
        match err {
            shared::Error::NotFound => {
                ApiError::Status(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
            }
            shared::Error::Cancelled => ApiError::Status(
                StatusCode::SERVICE_UNAVAILABLE,
                "Request cancelled before completion".to_string(),
            ),
            shared::Error::Internal(_) => ApiError::Status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process receipt".to_string(),
            ),
        }
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Status(status, message) => {
                let body = ErrorResponse {
                    status_text: status_text(status),
                    message,
                };
                (status, Json(body)).into_response()
            }
            ApiError::Validation(errors) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ValidationErrorResponse {
                    status_text: status_text(status),
                    message: "Receipt failed validation".to_string(),
                    errors: errors.iter().map(FieldError::from).collect(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
