//! The remote store boundary.

use async_trait::async_trait;

use crate::{Category, Expense, ExpenseId, ExpenseInput, RemoteError};

/// CRUD endpoints of the store backing an [`ExpenseStore`].
///
/// Every call is a single request/response pair: the caller suspends only
/// while the request is in flight. Cancellation is not supported; dropping a
/// returned future abandons the request without any guarantee about whether
/// the remote side applied it.
///
/// [`ExpenseStore`]: crate::ExpenseStore
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All expenses, in the store's order.
    async fn list_expenses(&self) -> Result<Vec<Expense>, RemoteError>;

    /// A single expense, or [`RemoteError::NotFound`].
    async fn get_expense(&self, id: ExpenseId) -> Result<Expense, RemoteError>;

    /// Persists a new expense and returns it with its assigned id.
    async fn create_expense(&self, input: &ExpenseInput) -> Result<Expense, RemoteError>;

    /// Replaces the fields of an existing expense and returns the stored record.
    async fn update_expense(
        &self,
        id: ExpenseId,
        input: &ExpenseInput,
    ) -> Result<Expense, RemoteError>;

    /// Deletes an expense. Any response body is ignored.
    async fn delete_expense(&self, id: ExpenseId) -> Result<(), RemoteError>;

    /// All categories, in the store's order.
    async fn list_categories(&self) -> Result<Vec<Category>, RemoteError>;

    /// Persists a new category and returns it with its assigned id.
    async fn create_category(&self, name: &str) -> Result<Category, RemoteError>;
}
