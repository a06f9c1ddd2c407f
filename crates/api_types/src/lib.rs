use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical wire form of expense dates: no timezone, no fractional seconds.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Serde adapter for [`NaiveDateTime`] fields on the wire.
///
/// Dates are always written as [`DATE_FORMAT`]. On read the fractional part
/// (some backends echo microseconds) and an RFC 3339 offset are tolerated and
/// dropped.
pub mod wire_date {
    use chrono::{DateTime, NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::DATE_FORMAT;

    const FRACTIONAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|err| D::Error::custom(format!("invalid date '{raw}': {err}")))
    }

    /// Parses a wire date, truncating any sub-second precision.
    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let raw = raw.trim();
        let parsed = NaiveDateTime::parse_from_str(raw, DATE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, FRACTIONAL_FORMAT))
            .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|date| date.naive_local()))?;
        Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
    }

    /// Formats a date in the canonical wire form.
    pub fn format(date: &NaiveDateTime) -> String {
        date.format(DATE_FORMAT).to_string()
    }
}

pub mod category {
    use super::*;

    /// Category as returned by `GET /categories/` and `POST /categories/`.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
    }

    /// Request body for `POST /categories/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreate {
        pub name: String,
    }
}

pub mod expense {
    use super::*;
    use crate::category::CategoryView;

    /// Expense as returned by the remote store.
    ///
    /// List and detail responses embed the owning category next to
    /// `category_id`; it is optional here so that a bare record still decodes.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub title: String,
        pub amount: f64,
        pub category_id: i64,
        #[serde(with = "crate::wire_date")]
        pub date: NaiveDateTime,
        #[serde(default)]
        pub notes: Option<String>,
        #[serde(default)]
        pub category: Option<CategoryView>,
    }

    /// Request body for `POST /expenses/` and `PUT /expenses/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseWrite {
        pub title: String,
        pub amount: f64,
        pub category_id: i64,
        #[serde(with = "crate::wire_date")]
        pub date: NaiveDateTime,
        pub notes: Option<String>,
    }
}

pub mod error {
    use super::*;

    /// Error body returned by the remote store.
    ///
    /// `detail` is usually a string but validation failures carry a list of
    /// objects, so it is kept as raw JSON.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        #[serde(alias = "error")]
        pub detail: serde_json::Value,
    }

    impl ErrorResponse {
        /// Human readable message for the error.
        pub fn message(&self) -> String {
            match &self.detail {
                serde_json::Value::String(message) => message.clone(),
                other => other.to_string(),
            }
        }
    }
}
