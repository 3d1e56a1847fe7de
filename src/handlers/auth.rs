//! Authentication HTTP handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// POST /login - Verify account credentials and issue a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.auth_service.login(req.number, &req.password).await?;

    Ok(Json(response))
}
