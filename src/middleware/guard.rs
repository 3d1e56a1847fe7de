//! Access guard for account-owned resources
//!
//! The guard is an ordered pipeline of stages folded over a [`GuardState`]:
//!
//! ```text
//! Unauthenticated -> TokenExtracted -> TokenValidated -> IdentityMatched -> Authorized
//! ```
//!
//! Any stage may deny, which ends evaluation. Denials carry a reason for the
//! logs, but every denial renders the same 403 response.
//!
//! The guard only sees requests through [`RequestView`], so it does not depend
//! on the router.

use axum::{
    async_trait,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::{Claims, TokenService};
use crate::error::ApiError;
use crate::models::Account;
use crate::store::AccountStore;

/// Header carrying the account token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Path parameter naming the addressed account row
pub const ACCOUNT_ID_PARAM: &str = "id";

/// Read access to the parts of a request the guard needs
pub trait RequestView: Send + Sync {
    fn header(&self, name: &str) -> Option<&str>;
    fn path_param(&self, name: &str) -> Option<&str>;
}

/// Progress of a request through the guard
#[derive(Debug, Clone)]
pub enum GuardState {
    Unauthenticated,
    TokenExtracted { token: String },
    TokenValidated { claims: Claims },
    IdentityMatched { claims: Claims, account: Account },
}

/// Why a request was denied. Logged, never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingToken,
    InvalidToken,
    InvalidAccountId,
    AccountUnavailable,
    IdentityMismatch,
    /// A stage was handed a state it does not accept
    OutOfOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub stage: &'static str,
    pub reason: DenyReason,
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        ApiError::Forbidden.into_response()
    }
}

/// Identity established for an authorized request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    pub account_id: i32,
    pub account_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(Authorized),
    Deny(Denial),
}

/// One step of the guard pipeline
#[async_trait]
pub trait GuardStage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn evaluate(
        &self,
        request: &dyn RequestView,
        state: GuardState,
    ) -> Result<GuardState, DenyReason>;
}

/// Pulls the raw token out of its header
pub struct ExtractToken;

#[async_trait]
impl GuardStage for ExtractToken {
    fn name(&self) -> &'static str {
        "extract_token"
    }

    async fn evaluate(
        &self,
        request: &dyn RequestView,
        state: GuardState,
    ) -> Result<GuardState, DenyReason> {
        let GuardState::Unauthenticated = state else {
            return Err(DenyReason::OutOfOrder);
        };

        match request.header(TOKEN_HEADER).map(str::trim) {
            Some(token) if !token.is_empty() => Ok(GuardState::TokenExtracted {
                token: token.to_string(),
            }),
            _ => Err(DenyReason::MissingToken),
        }
    }
}

/// Checks signature, algorithm and expiry
pub struct ValidateToken {
    tokens: Arc<TokenService>,
}

impl ValidateToken {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl GuardStage for ValidateToken {
    fn name(&self) -> &'static str {
        "validate_token"
    }

    async fn evaluate(
        &self,
        _request: &dyn RequestView,
        state: GuardState,
    ) -> Result<GuardState, DenyReason> {
        let GuardState::TokenExtracted { token } = state else {
            return Err(DenyReason::OutOfOrder);
        };

        let claims = self
            .tokens
            .validate(&token)
            .map_err(|_| DenyReason::InvalidToken)?;

        Ok(GuardState::TokenValidated { claims })
    }
}

/// Resolves the path-addressed account and requires it to be the token's owner
pub struct MatchIdentity {
    store: Arc<dyn AccountStore>,
}

impl MatchIdentity {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GuardStage for MatchIdentity {
    fn name(&self) -> &'static str {
        "match_identity"
    }

    async fn evaluate(
        &self,
        request: &dyn RequestView,
        state: GuardState,
    ) -> Result<GuardState, DenyReason> {
        let GuardState::TokenValidated { claims } = state else {
            return Err(DenyReason::OutOfOrder);
        };

        let id = request
            .path_param(ACCOUNT_ID_PARAM)
            .and_then(|raw| raw.parse::<i32>().ok())
            .ok_or(DenyReason::InvalidAccountId)?;

        let account = self.store.find_by_id(id).await.map_err(|e| {
            tracing::debug!(account_id = id, error = %e, "Addressed account unavailable");
            DenyReason::AccountUnavailable
        })?;

        if account.number != claims.account_number {
            return Err(DenyReason::IdentityMismatch);
        }

        Ok(GuardState::IdentityMatched { claims, account })
    }
}

/// Ordered stage pipeline deciding whether a request may reach its handler
pub struct AccessGuard {
    stages: Vec<Box<dyn GuardStage>>,
}

impl AccessGuard {
    /// The standard pipeline: extract, validate, match identity
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn AccountStore>) -> Self {
        Self::from_stages(vec![
            Box::new(ExtractToken),
            Box::new(ValidateToken::new(tokens)),
            Box::new(MatchIdentity::new(store)),
        ])
    }

    pub fn from_stages(stages: Vec<Box<dyn GuardStage>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn evaluate(&self, request: &dyn RequestView) -> Decision {
        let mut state = GuardState::Unauthenticated;

        for stage in &self.stages {
            state = match stage.evaluate(request, state).await {
                Ok(next) => next,
                Err(reason) => {
                    tracing::warn!(stage = stage.name(), reason = ?reason, "Access denied");
                    return Decision::Deny(Denial {
                        stage: stage.name(),
                        reason,
                    });
                }
            };
        }

        match state {
            GuardState::IdentityMatched { account, .. } => Decision::Allow(Authorized {
                account_id: account.id,
                account_number: account.number,
            }),
            _ => {
                tracing::warn!("Access denied: pipeline ended before identity was matched");
                Decision::Deny(Denial {
                    stage: "authorize",
                    reason: DenyReason::OutOfOrder,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAccount;
    use crate::store::MemoryAccountStore;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeRequest {
        headers: HashMap<String, String>,
        params: HashMap<String, String>,
    }

    impl FakeRequest {
        fn with_token(mut self, token: &str) -> Self {
            self.headers.insert(TOKEN_HEADER.to_string(), token.to_string());
            self
        }

        fn with_id(mut self, id: impl ToString) -> Self {
            self.params.insert(ACCOUNT_ID_PARAM.to_string(), id.to_string());
            self
        }
    }

    impl RequestView for FakeRequest {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).map(String::as_str)
        }

        fn path_param(&self, name: &str) -> Option<&str> {
            self.params.get(name).map(String::as_str)
        }
    }

    struct Fixture {
        guard: AccessGuard,
        tokens: Arc<TokenService>,
        alice: Account,
        bob: Account,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryAccountStore::new());
        let mut created = Vec::new();
        for (name, number) in [("Alice", 111_111), ("Bob", 222_222)] {
            created.push(
                store
                    .create(NewAccount {
                        first_name: name.to_string(),
                        last_name: "Test".to_string(),
                        number,
                        password_hash: "unused".to_string(),
                        created_at: Utc::now(),
                    })
                    .await
                    .unwrap(),
            );
        }
        let bob = created.pop().unwrap();
        let alice = created.pop().unwrap();

        let tokens = Arc::new(TokenService::new(b"guard-secret", Duration::minutes(15)).unwrap());
        Fixture {
            guard: AccessGuard::new(tokens.clone(), store),
            tokens,
            alice,
            bob,
        }
    }

    fn denied_with(decision: Decision, stage: &str, reason: DenyReason) {
        match decision {
            Decision::Deny(denial) => {
                assert_eq!(denial.stage, stage);
                assert_eq!(denial.reason, reason);
            }
            Decision::Allow(a) => panic!("expected denial, got {:?}", a),
        }
    }

    #[tokio::test]
    async fn test_owner_is_authorized() {
        let f = fixture().await;
        let token = f.tokens.issue(f.alice.number).unwrap().token;

        let decision = f
            .guard
            .evaluate(&FakeRequest::default().with_token(&token).with_id(f.alice.id))
            .await;

        assert_eq!(
            decision,
            Decision::Allow(Authorized {
                account_id: f.alice.id,
                account_number: f.alice.number,
            })
        );
    }

    #[tokio::test]
    async fn test_missing_or_blank_token() {
        let f = fixture().await;

        denied_with(
            f.guard.evaluate(&FakeRequest::default().with_id(f.alice.id)).await,
            "extract_token",
            DenyReason::MissingToken,
        );
        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token("   ").with_id(f.alice.id))
                .await,
            "extract_token",
            DenyReason::MissingToken,
        );
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let f = fixture().await;

        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token("garbage").with_id(f.alice.id))
                .await,
            "validate_token",
            DenyReason::InvalidToken,
        );
    }

    #[tokio::test]
    async fn test_expired_token() {
        let f = fixture().await;
        let stale = f
            .tokens
            .issue_at(f.alice.number, Utc::now() - Duration::hours(1))
            .unwrap()
            .token;

        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token(&stale).with_id(f.alice.id))
                .await,
            "validate_token",
            DenyReason::InvalidToken,
        );
    }

    #[tokio::test]
    async fn test_bad_path_id() {
        let f = fixture().await;
        let token = f.tokens.issue(f.alice.number).unwrap().token;

        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token(&token).with_id("abc"))
                .await,
            "match_identity",
            DenyReason::InvalidAccountId,
        );
        denied_with(
            f.guard.evaluate(&FakeRequest::default().with_token(&token)).await,
            "match_identity",
            DenyReason::InvalidAccountId,
        );
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let f = fixture().await;
        let token = f.tokens.issue(f.alice.number).unwrap().token;

        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token(&token).with_id(9_999))
                .await,
            "match_identity",
            DenyReason::AccountUnavailable,
        );
    }

    #[tokio::test]
    async fn test_token_for_other_account_is_denied() {
        let f = fixture().await;
        let alice_token = f.tokens.issue(f.alice.number).unwrap().token;

        denied_with(
            f.guard
                .evaluate(&FakeRequest::default().with_token(&alice_token).with_id(f.bob.id))
                .await,
            "match_identity",
            DenyReason::IdentityMismatch,
        );
    }

    #[tokio::test]
    async fn test_incomplete_pipeline_never_allows() {
        let f = fixture().await;
        let token = f.tokens.issue(f.alice.number).unwrap().token;
        let guard = AccessGuard::from_stages(vec![
            Box::new(ExtractToken),
            Box::new(ValidateToken::new(f.tokens.clone())),
        ]);

        denied_with(
            guard
                .evaluate(&FakeRequest::default().with_token(&token).with_id(f.alice.id))
                .await,
            "authorize",
            DenyReason::OutOfOrder,
        );
    }

    #[tokio::test]
    async fn test_misordered_stages_deny() {
        let f = fixture().await;
        let token = f.tokens.issue(f.alice.number).unwrap().token;
        let guard = AccessGuard::from_stages(vec![
            Box::new(ValidateToken::new(f.tokens.clone())),
            Box::new(ExtractToken),
        ]);

        denied_with(
            guard
                .evaluate(&FakeRequest::default().with_token(&token).with_id(f.alice.id))
                .await,
            "validate_token",
            DenyReason::OutOfOrder,
        );
        assert_eq!(
            f.guard.stage_names(),
            vec!["extract_token", "validate_token", "match_identity"]
        );
    }
}
