//! Authentication middleware
//!
//! Runs the [`AccessGuard`] in front of account-owned routes and exposes the
//! resulting identity to handlers.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

use super::guard::{AccessGuard, Authorized, Decision, RequestView};
use crate::error::ApiError;

/// [`RequestView`] over an axum request's headers and matched path params
pub struct HttpRequestView<'a> {
    headers: &'a HeaderMap,
    params: &'a HashMap<String, String>,
}

impl<'a> HttpRequestView<'a> {
    pub fn new(headers: &'a HeaderMap, params: &'a HashMap<String, String>) -> Self {
        Self { headers, params }
    }
}

impl RequestView for HttpRequestView<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn path_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Route-layer middleware: only lets the request through when the token's
/// account owns the account addressed by the path.
///
/// ```rust,ignore
/// Router::new()
///     .route("/account/:id", get(get_account))
///     .route_layer(from_fn_with_state(state, require_account_owner))
/// ```
pub async fn require_account_owner(
    State(guard): State<Arc<AccessGuard>>,
    path: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let params = path.map(|Path(params)| params).unwrap_or_default();

    let decision = {
        let view = HttpRequestView::new(request.headers(), &params);
        guard.evaluate(&view).await
    };

    match decision {
        Decision::Allow(authorized) => {
            request.extensions_mut().insert(authorized);
            next.run(request).await
        }
        Decision::Deny(denial) => denial.into_response(),
    }
}

/// Extractor for the identity established by [`require_account_owner`].
///
/// Rejects with 403 when the route is not behind the guard.
#[async_trait]
impl<S> FromRequestParts<S> for Authorized
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authorized>()
            .copied()
            .ok_or(ApiError::Forbidden)
    }
}
