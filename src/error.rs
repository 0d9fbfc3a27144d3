// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{TxKind, YearMonth};

/// A write that was refused before anything was persisted.
///
/// The `Display` text is the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: Decimal,
        max: Decimal,
    },
    #[error("Category '{0}' does not exist")]
    UnknownCategory(String),
    #[error("Category '{category}' is an {actual} category, not {expected}")]
    CategoryTypeMismatch {
        category: String,
        expected: TxKind,
        actual: TxKind,
    },
    #[error("Budgets can only be set on Expense categories ('{0}' is not one)")]
    NotAnExpenseCategory(String),
    #[error("A budget already exists for category '{category}' in {month}")]
    DuplicateBudget { category: String, month: YearMonth },
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Invalid value '{value}' for setting '{key}'")]
    InvalidSetting { key: String, value: String },
    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),
}

/// The blob store underneath the collections failed.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Declined(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// The stored value is not JSON of the expected shape; writing over it
    /// would lose whatever it holds.
    #[error("Stored value under '{key}' is unreadable; export it or run `finora reset` before writing")]
    Unreadable { key: String },
}

impl StoreError {
    /// The decline reason, if this was a refused write rather than a backend fault.
    pub fn declined(&self) -> Option<&ValidationError> {
        match self {
            StoreError::Declined(v) => Some(v),
            StoreError::Backend(_) | StoreError::Unreadable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(BackendError::Sqlite(e))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Backend(BackendError::Encode(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
