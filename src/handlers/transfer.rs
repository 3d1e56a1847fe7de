//! Transfer HTTP handlers

use axum::Json;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::TransferRequest;

/// POST /transfer - Accept a transfer request.
///
/// Balances are not touched; the request is echoed back.
pub async fn transfer(
    ApiJson(req): ApiJson<TransferRequest>,
) -> Result<Json<TransferRequest>, ApiError> {
    tracing::info!(to_account = req.to_account, amount = req.amount, "Transfer requested");

    Ok(Json(req))
}
