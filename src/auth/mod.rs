//! Authentication module
//!
//! Password-based authentication for accounts.
//! - bcrypt credential hashing and verification
//! - JWT token issuance and validation

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, IssuedToken, TokenError, TokenService, TOKEN_ALGORITHM};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{AuthError, AuthService};
