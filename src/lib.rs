//! Account API Library
//!
//! Account management over HTTP: account creation, lookup and deletion,
//! password login issuing signed tokens, and an access guard tying each token
//! to the account it was issued for.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
