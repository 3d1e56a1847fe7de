//! Account HTTP handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::middleware::Authorized;
use crate::models::{AccountResponse, CreateAccountRequest, DeleteAccountResponse};
use crate::state::AppState;

/// POST /account - Open a new account
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.account_service.create_account(req).await?;

    Ok(Json(account.into()))
}

/// GET /account - List all accounts
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.account_service.list_accounts().await?;

    let response: Vec<AccountResponse> = accounts.into_iter().map(|a| a.into()).collect();
    Ok(Json(response))
}

/// GET /account/:id - Fetch the caller's own account
pub async fn get_account(
    State(state): State<AppState>,
    authorized: Authorized,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .account_service
        .get_account(authorized.account_id)
        .await?;

    Ok(Json(account.into()))
}

/// DELETE /account/:id - Close the caller's own account
pub async fn delete_account(
    State(state): State<AppState>,
    authorized: Authorized,
) -> Result<Json<DeleteAccountResponse>, ApiError> {
    state
        .account_service
        .delete_account(authorized.account_id)
        .await?;

    Ok(Json(DeleteAccountResponse {
        deleted: authorized.account_id,
    }))
}
