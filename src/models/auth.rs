//! Authentication models

use serde::{Deserialize, Serialize};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

/// Login response carrying the signed token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub number: i64,
}
