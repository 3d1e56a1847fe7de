//! JWT token generation and validation
//!
//! Tokens are HS256 JWTs binding an account number to an expiry instant.
//! Nothing is persisted server-side; validity is decided by signature and
//! embedded expiry alone.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only signing algorithm accepted
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Token signing secret is not configured")]
    MissingSecret,

    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Invalid token")]
    InvalidToken,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account number the token was issued for
    #[serde(rename = "accountNumber")]
    pub account_number: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates account tokens with a single server-held secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service. An empty secret is a configuration error.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is compared against the caller's clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token for an account, expiring `ttl` from now
    pub fn issue(&self, account_number: i64) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_number, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        account_number: i64,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            TokenError::EncodingFailed("token expiry is out of range".to_string())
        })?;
        let claims = Claims {
            account_number,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify and decode a token against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Verify and decode a token as if the current time were `now`.
    ///
    /// Signature, algorithm, structure and expiry failures are reported
    /// identically.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?;

        let claims = token_data.claims;
        if now.timestamp() >= claims.exp {
            tracing::debug!(exp = claims.exp, "Token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }
}
