//! Filtered and sorted views over the expenses collection.
//!
//! Views borrow from the collection they are computed from and never modify
//! it. Filtering always comes first: [`query`] runs [`filter`] and then
//! [`sort`] on the surviving records only.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CategoryId, Expense, ValidationError};

/// Ordering of a list view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::AmountDesc,
        SortKey::AmountAsc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::AmountDesc => "amount-desc",
            Self::AmountAsc => "amount-asc",
        }
    }

    fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Self::DateDesc => b.date.cmp(&a.date),
            Self::DateAsc => a.date.cmp(&b.date),
            Self::AmountDesc => b.amount.total_cmp(&a.amount),
            Self::AmountAsc => a.amount.total_cmp(&b.amount),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| ValidationError::UnknownSortKey(key.to_string()))
    }
}

/// Parameters of a list view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    /// Free text matched against title and notes; empty matches everything.
    pub search: String,
    /// `None` means all categories.
    pub category: Option<CategoryId>,
    pub sort: SortKey,
}

/// Keeps the expenses matching both `search_term` and `category`, in input
/// order.
///
/// An expense matches the search when the term is empty or is contained,
/// ignoring case, in its title or its notes. Absent or empty notes never match
/// the notes clause. The result can be fed back into `filter`; doing so with
/// the same arguments returns it unchanged.
pub fn filter<'a, I>(
    expenses: I,
    search_term: &str,
    category: Option<CategoryId>,
) -> Vec<&'a Expense>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let needle = search_term.to_lowercase();
    expenses
        .into_iter()
        .filter(|expense| matches_search(expense, &needle))
        .filter(|expense| category.is_none_or(|id| expense.category_id == id))
        .collect()
}

fn matches_search(expense: &Expense, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    expense.title.to_lowercase().contains(needle)
        || expense
            .notes()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

/// Orders expenses by `key`.
///
/// The sort is stable: expenses with equal keys keep their relative input
/// order. Dates compare chronologically.
pub fn sort<'a>(mut expenses: Vec<&'a Expense>, key: SortKey) -> Vec<&'a Expense> {
    expenses.sort_by(|a, b| key.compare(a, b));
    expenses
}

/// `sort(filter(expenses, ..), ..)` for the parameters in `query`.
pub fn query<'a>(expenses: &'a [Expense], query: &ExpenseQuery) -> Vec<&'a Expense> {
    sort(filter(expenses, &query.search, query.category), query.sort)
}
