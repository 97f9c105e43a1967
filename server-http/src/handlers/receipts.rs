use crate::error::{ApiError, INVALID_JSON_MESSAGE};
use crate::models::{GetPointsResponse, ProcessReceiptRequest, ProcessReceiptResponse};
use crate::state::AppState;
use crate::validation::ReceiptValidator;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::{debug, info, warn};

/// POST /receipts/process
pub async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<ProcessReceiptRequest>, JsonRejection>,
) -> Result<Json<ProcessReceiptResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected receipt body: {}", rejection.body_text());
        ApiError::bad_request(INVALID_JSON_MESSAGE)
    })?;

    let record = ReceiptValidator::from_request(req).map_err(|errors| {
        debug!("Receipt failed validation with {} error(s)", errors.len());
        ApiError::Validation(errors)
    })?;

    let ctx = state.request_context();
    let _guard = ctx.clone().drop_guard();

    let id = state.receipts.process_receipt(&ctx, &record).await?;
    info!("POST /receipts/process: id={}", id);

    Ok(Json(ProcessReceiptResponse { id }))
}

/// GET /receipts/{id}/points
pub async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GetPointsResponse>, ApiError> {
    let ctx = state.request_context();
    let _guard = ctx.clone().drop_guard();

    let points = state.receipts.get_points(&ctx, &id).await?;
    debug!("GET /receipts/{}/points: {}", id, points);

    Ok(Json(GetPointsResponse { points }))
}
