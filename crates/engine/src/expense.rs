//! Expense records.

use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Amount, Category, CategoryId};

/// Remote-assigned expense identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ExpenseId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ExpenseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An expense as confirmed by the remote store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub amount: Amount,
    pub category_id: CategoryId,
    pub date: NaiveDateTime,
    /// Stored in full; truncation is a display concern.
    pub notes: Option<String>,
    /// Category embedded by the remote store on reads, if any.
    pub category: Option<Category>,
}

impl Expense {
    /// Builds the record a store returns after persisting `input` as `id`.
    pub fn from_input(id: impl Into<ExpenseId>, input: ExpenseInput) -> Self {
        Self {
            id: id.into(),
            title: input.title,
            amount: input.amount,
            category_id: input.category_id,
            date: input.date,
            notes: input.notes,
            category: None,
        }
    }

    /// Notes, treating an empty string as absent.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|notes| !notes.is_empty())
    }
}

/// Fields of an expense without its `id`: the body of create and update
/// requests.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseInput {
    pub title: String,
    pub amount: Amount,
    pub category_id: CategoryId,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

impl From<&Expense> for ExpenseInput {
    fn from(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount: expense.amount,
            category_id: expense.category_id,
            date: expense.date,
            notes: expense.notes.clone(),
        }
    }
}
