//! Account routes

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::handlers::account;
use crate::middleware::require_account_owner;
use crate::state::AppState;

/// Create account routes. `/account/:id` is only reachable by the account's owner.
pub fn account_routes(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route(
            "/account/:id",
            get(account::get_account).delete(account::delete_account),
        )
        .route_layer(from_fn_with_state(state, require_account_owner));

    Router::new()
        .route(
            "/account",
            get(account::list_accounts).post(account::create_account),
        )
        .merge(owned)
}
