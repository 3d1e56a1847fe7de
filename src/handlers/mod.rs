//! API handlers

pub mod account;
pub mod auth;
pub mod health;
pub mod transfer;

pub use account::*;
pub use auth::*;
pub use health::*;
pub use transfer::*;
