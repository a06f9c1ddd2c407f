//! Input validation at the engine boundary.
//!
//! UI collaborators hand raw field values to the engine as an
//! [`ExpenseDraft`]; [`ExpenseDraft::parse`] turns them into a typed
//! [`ExpenseInput`]. The store re-checks every input with
//! [`validate_expense`] and [`validate_category_name`] before any remote call,
//! so a rejected input never reaches the remote store.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::{
    Amount, Category, CategoryId, CategoryIndex, Expense, ExpenseInput, ValidationError,
    category::MAX_CATEGORY_NAME_LEN,
};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_TIME_FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_TIME_SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw, unvalidated expense fields as typed by a user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    pub category_id: String,
    pub date: String,
    pub notes: String,
}

impl ExpenseDraft {
    /// Parses every field, reporting the first invalid one.
    ///
    /// Blank notes become `None`; other fields are required. This does not
    /// check that the category exists, see [`validate_expense`].
    pub fn parse(&self) -> Result<ExpenseInput, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let amount: Amount = self.amount.parse()?;
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount);
        }

        let category_raw = self.category_id.trim();
        if category_raw.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let category_id: CategoryId = category_raw
            .parse()
            .map_err(|_| ValidationError::InvalidCategoryId(category_raw.to_string()))?;

        let date = parse_date(&self.date)?;

        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(ExpenseInput {
            title: title.to_string(),
            amount,
            category_id,
            date,
            notes,
        })
    }
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            amount: expense.amount.value().to_string(),
            category_id: expense.category_id.to_string(),
            date: expense.date.format(DATE_TIME_FORMAT).to_string(),
            notes: expense.notes.clone().unwrap_or_default(),
        }
    }
}

/// Parses a user supplied date.
///
/// Accepts `YYYY-MM-DDTHH:mm:ss` (optionally with fractional seconds, which
/// are dropped), `YYYY-MM-DD HH:mm:ss`, or a bare `YYYY-MM-DD` (midnight).
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDate);
    }

    let parsed = NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATE_TIME_FRACTIONAL_FORMAT))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATE_TIME_SPACED_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))?;

    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}

/// Checks an expense against the rules the remote store relies on: a
/// non-empty title, a strictly positive amount and a category that exists in
/// `categories`.
pub fn validate_expense(
    input: &ExpenseInput,
    categories: &[Category],
) -> Result<(), ValidationError> {
    if input.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if !input.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    if !categories
        .iter()
        .any(|category| category.id == input.category_id)
    {
        return Err(ValidationError::UnknownCategory(input.category_id));
    }
    Ok(())
}

/// Validates a new category name and returns it trimmed.
///
/// Names are required, at most [`MAX_CATEGORY_NAME_LEN`] characters and unique
/// ignoring case.
pub fn validate_category_name(
    name: &str,
    index: &CategoryIndex,
) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingCategoryName);
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::CategoryNameTooLong {
            max: MAX_CATEGORY_NAME_LEN,
        });
    }
    if index.contains(name) {
        return Err(ValidationError::DuplicateCategory(name.to_string()));
    }
    Ok(name.to_string())
}
