//! Middleware for the account API
//!
//! This module provides middleware for request tracing, security headers,
//! and the access guard in front of account-owned routes.

pub mod auth;
pub mod guard;
mod security;
mod tracing;

pub use auth::{require_account_owner, HttpRequestView};
pub use guard::{
    AccessGuard, Authorized, Decision, Denial, DenyReason, GuardStage, GuardState, RequestView,
    ACCOUNT_ID_PARAM, TOKEN_HEADER,
};
pub use security::{hsts_header, security_headers};
pub use self::tracing::{request_tracing, REQUEST_ID_HEADER};
