//! Text rendering of snapshots and views.

use chrono::NaiveDateTime;
use engine::{Amount, Category, Expense, Snapshot, aggregation};

/// Notes longer than this are cut in list views.
pub const NOTES_PREVIEW_LEN: usize = 50;
const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone)]
pub struct Renderer {
    currency_symbol: String,
}

impl Renderer {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn money(&self, amount: Amount) -> String {
        format!("{}{amount}", self.currency_symbol)
    }

    /// Dashboard: totals, breakdown by amount and the newest expenses.
    pub fn summary(&self, snapshot: &Snapshot) -> String {
        let summary = snapshot.summary();
        let mut lines = vec![
            format!("Total expenses: {}", self.money(summary.total)),
            format!("Expenses: {}", summary.expense_count),
            format!("Categories: {}", summary.category_count),
            String::new(),
            "By category".to_string(),
        ];

        let breakdown = aggregation::sort_by_total_desc(summary.by_category);
        if breakdown.is_empty() {
            lines.push("  No categories yet.".to_string());
        }
        lines.extend(breakdown.iter().map(|entry| {
            format!(
                "  {:<20} {:>12} {:>7.2}%",
                entry.category,
                self.money(entry.total),
                entry.percentage
            )
        }));

        lines.push(String::new());
        lines.push("Recent expenses".to_string());
        if summary.recent.is_empty() {
            lines.push("  No expenses yet.".to_string());
        }
        lines.extend(
            summary
                .recent
                .iter()
                .map(|expense| format!("  {}", self.expense_line(snapshot, expense))),
        );
        block(lines)
    }

    pub fn expense_list(&self, snapshot: &Snapshot, expenses: &[&Expense]) -> String {
        if expenses.is_empty() {
            return "No expenses found.\n".to_string();
        }
        let mut lines = Vec::with_capacity(expenses.len());
        for expense in expenses {
            lines.push(self.expense_line(snapshot, expense));
            if let Some(notes) = expense.notes() {
                lines.push(format!("      {}", notes_preview(notes)));
            }
        }
        block(lines)
    }

    /// Every field of one expense, notes in full.
    pub fn expense_detail(&self, snapshot: &Snapshot, expense: &Expense) -> String {
        let mut lines = vec![
            format!("#{} {}", expense.id, expense.title),
            format!("Amount:   {}", self.money(expense.amount)),
            format!("Category: {}", category_label(snapshot, expense)),
            format!("Date:     {}", display_date(&expense.date)),
        ];
        if let Some(notes) = expense.notes() {
            lines.push(format!("Notes:    {notes}"));
        }
        block(lines)
    }

    /// Categories in collection order with their share of the total.
    pub fn categories(&self, snapshot: &Snapshot) -> String {
        if snapshot.categories.is_empty() {
            return "No categories yet.\n".to_string();
        }
        let lines = snapshot
            .expenses_by_category()
            .iter()
            .map(|entry| {
                format!(
                    "#{:<4} {:<20} {:>12} {:>7.2}%",
                    entry.category_id,
                    entry.category,
                    self.money(entry.total),
                    entry.percentage
                )
            })
            .collect();
        block(lines)
    }

    pub fn category_created(&self, category: &Category) -> String {
        format!("Added category #{} {}\n", category.id, category.name)
    }

    fn expense_line(&self, snapshot: &Snapshot, expense: &Expense) -> String {
        format!(
            "#{:<4} {}  {:<24} {:<16} {:>12}",
            expense.id,
            display_date(&expense.date),
            expense.title,
            category_label(snapshot, expense),
            self.money(expense.amount)
        )
    }
}

/// One line per entry, newline terminated.
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn display_date(date: &NaiveDateTime) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Cuts `notes` to [`NOTES_PREVIEW_LEN`] characters, marking the cut with
/// `...`.
pub fn notes_preview(notes: &str) -> String {
    if notes.chars().count() <= NOTES_PREVIEW_LEN {
        return notes.to_string();
    }
    let mut preview: String = notes.chars().take(NOTES_PREVIEW_LEN).collect();
    preview.push_str("...");
    preview
}

fn category_label<'a>(snapshot: &'a Snapshot, expense: &'a Expense) -> &'a str {
    snapshot.category_name(expense).unwrap_or(UNCATEGORIZED)
}
