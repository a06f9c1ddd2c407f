//! Client-side expense ledger engine.
//!
//! [`ExpenseStore`] keeps the expenses and categories of a [`RemoteStore`] in
//! memory and mediates every change to them. Derived views are plain
//! functions over a [`Snapshot`]:
//!
//! - [`aggregation`]: totals and per-category breakdowns.
//! - [`query`]: filtered and sorted lists.
//! - [`validation`]: turning raw user input into records.

pub use amount::Amount;
pub use category::{Category, CategoryId, CategoryIndex, MAX_CATEGORY_NAME_LEN};
pub use error::{EngineError, Operation, RemoteError, ValidationError};
pub use expense::{Expense, ExpenseId, ExpenseInput};
pub use query::{ExpenseQuery, SortKey};
pub use remote::RemoteStore;
pub use store::{ExpenseStore, Snapshot};
pub use validation::ExpenseDraft;

pub mod aggregation;
mod amount;
mod category;
mod error;
mod expense;
pub mod query;
mod remote;
mod store;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
