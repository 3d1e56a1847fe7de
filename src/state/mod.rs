//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{AuthService, TokenService};
use crate::middleware::AccessGuard;
use crate::services::AccountService;
use crate::store::AccountStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
    pub auth_service: Arc<AuthService>,
    pub guard: Arc<AccessGuard>,
    pub store: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(
        account_service: Arc<AccountService>,
        auth_service: Arc<AuthService>,
        guard: Arc<AccessGuard>,
        store: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            account_service,
            auth_service,
            guard,
            store,
        }
    }

    /// Wire every service around one store and one token service
    pub fn from_parts(store: Arc<dyn AccountStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        let tokens = Arc::new(tokens);

        Self::new(
            Arc::new(AccountService::new(store.clone(), bcrypt_cost)),
            Arc::new(AuthService::new(store.clone(), tokens.clone())),
            Arc::new(AccessGuard::new(tokens, store.clone())),
            store,
        )
    }
}

impl FromRef<AppState> for Arc<AccountService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.account_service.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AccessGuard> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.guard.clone()
    }
}
