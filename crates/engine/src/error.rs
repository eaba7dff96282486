//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientFunds`] thrown when a withdrawal or transfer exceeds the balance.
//! - [`InvalidCredentials`] thrown when authentication fails, without saying why.
//! - [`Storage`] thrown when the backing document cannot be read or written.
//!
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
//!  [`Storage`]: EngineError::Storage
use thiserror::Error;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidNumber(String),
    #[error("Amount must be greater than zero!")]
    NonPositiveAmount,
    #[error("Insufficient funds: balance is {balance}")]
    InsufficientFunds { balance: Money },
    #[error("Recipient account is required!")]
    EmptyRecipient,
    #[error("Cannot transfer to your own account!")]
    SameAccount,
    #[error("Invalid username or password!")]
    InvalidCredentials,
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Failures of the document store itself, wrapped by [`EngineError::Storage`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidNumber(a), Self::InvalidNumber(b)) => a == b,
            (Self::NonPositiveAmount, Self::NonPositiveAmount) => true,
            (Self::InsufficientFunds { balance: a }, Self::InsufficientFunds { balance: b }) => {
                a == b
            }
            (Self::EmptyRecipient, Self::EmptyRecipient) => true,
            (Self::SameAccount, Self::SameAccount) => true,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::InvalidUser(a), Self::InvalidUser(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
