use crate::models::MessageResponse;
use axum::Json;

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Receipt processor is running".into(),
    })
}

/// GET /health
pub async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "OK".into(),
    })
}
