//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`RemoteError`] returned by a [`RemoteStore`] when a request fails.
//! - [`ValidationError`] returned when raw input cannot become a record.
//! - [`EngineError`] returned by every [`ExpenseStore`] operation.
//!
//!  [`RemoteStore`]: super::RemoteStore
//!  [`ExpenseStore`]: super::ExpenseStore
use std::fmt;

use thiserror::Error;

use crate::CategoryId;

/// The engine operation a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Load,
    FetchExpense,
    AddExpense,
    EditExpense,
    RemoveExpense,
    AddCategory,
}

impl Operation {
    /// Message recorded on the snapshot when the operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load data. Please try again later.",
            Self::FetchExpense => "Failed to load expense. Please try again.",
            Self::AddExpense => "Failed to add expense. Please try again.",
            Self::EditExpense => "Failed to update expense. Please try again.",
            Self::RemoveExpense => "Failed to delete expense. Please try again.",
            Self::AddCategory => "Failed to add category. Please try again.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Load => "load",
            Self::FetchExpense => "fetch expense",
            Self::AddExpense => "add expense",
            Self::EditExpense => "edit expense",
            Self::RemoveExpense => "remove expense",
            Self::AddCategory => "add category",
        };
        f.write_str(label)
    }
}

/// Failures at the remote store boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote store unreachable: {0}")]
    Unreachable(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("remote store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid remote payload: {0}")]
    Decode(String),
}

/// Input rejected before reaching the remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Amount is required")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Category is required")]
    MissingCategory,
    #[error("Invalid category id: {0}")]
    InvalidCategoryId(String),
    #[error("Category {0} does not exist")]
    UnknownCategory(CategoryId),
    #[error("Date is required")]
    MissingDate,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Category name is required")]
    MissingCategoryName,
    #[error("Category name must be {max} characters or less")]
    CategoryNameTooLong { max: usize },
    #[error("A category with this name already exists: {0}")]
    DuplicateCategory(String),
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
}

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{op} failed: {source}")]
    Remote {
        op: Operation,
        #[source]
        source: RemoteError,
    },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl EngineError {
    /// Returns `true` when the referenced record does not exist, locally or
    /// on the remote store.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound(_)
                | Self::Remote {
                    source: RemoteError::NotFound(_),
                    ..
                }
        )
    }
}
