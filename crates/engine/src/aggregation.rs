//! Totals and per-category breakdowns.
//!
//! Pure functions over a snapshot's collections. Nothing here is cached: call
//! them again after every mutation.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    Amount, Category, CategoryId, Expense,
    query::{self, SortKey},
};

/// Number of expenses shown in the dashboard's "recent" list.
pub const RECENT_EXPENSES_LIMIT: usize = 5;

/// Spend of a single category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub category: String,
    pub total: Amount,
    /// Share of the grand total, 0 when the grand total is 0.
    pub percentage: f64,
}

/// Everything the dashboard shows, computed in one pass over a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary<'a> {
    pub total: Amount,
    pub expense_count: usize,
    pub category_count: usize,
    /// In categories' collection order.
    pub by_category: Vec<CategoryTotal>,
    /// Newest first, at most [`RECENT_EXPENSES_LIMIT`].
    pub recent: Vec<&'a Expense>,
}

/// Sum of every amount; 0 for an empty collection.
pub fn total_expenses(expenses: &[Expense]) -> Amount {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// One entry per category, in `categories` order.
///
/// Expenses whose category is not in `categories` still count towards the
/// grand total, so percentages only add up to 100 when every expense resolves.
pub fn expenses_by_category(expenses: &[Expense], categories: &[Category]) -> Vec<CategoryTotal> {
    let grand_total = total_expenses(expenses);

    let mut totals: HashMap<CategoryId, Amount> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.category_id).or_default() += expense.amount;
    }

    categories
        .iter()
        .map(|category| {
            let total = totals.get(&category.id).copied().unwrap_or_default();
            CategoryTotal {
                category_id: category.id,
                category: category.name.clone(),
                total,
                percentage: total.percentage_of(grand_total),
            }
        })
        .collect()
}

/// Orders a breakdown by total, largest first. Ties keep their order.
pub fn sort_by_total_desc(mut breakdown: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    breakdown.sort_by(|a, b| b.total.total_cmp(&a.total));
    breakdown
}

/// The `limit` newest expenses.
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut recent = query::sort(expenses.iter().collect(), SortKey::DateDesc);
    recent.truncate(limit);
    recent
}

pub fn summarize<'a>(expenses: &'a [Expense], categories: &[Category]) -> Summary<'a> {
    Summary {
        total: total_expenses(expenses),
        expense_count: expenses.len(),
        category_count: categories.len(),
        by_category: expenses_by_category(expenses, categories),
        recent: recent_expenses(expenses, RECENT_EXPENSES_LIMIT),
    }
}
