//! Business logic services

mod account;

pub use account::{AccountError, AccountService, ACCOUNT_NUMBER_RANGE};
