//! Category labels and the case-insensitive name index.

use std::{collections::HashMap, fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Remote-assigned category identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for CategoryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Key used to compare category names case-insensitively.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lowercase name → id lookup over a categories collection.
///
/// When the remote store already holds duplicates the first one wins.
#[derive(Clone, Debug, Default)]
pub struct CategoryIndex {
    by_name: HashMap<String, CategoryId>,
}

impl CategoryIndex {
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut index = Self::default();
        for category in categories {
            index.insert(category);
        }
        index
    }

    pub fn insert(&mut self, category: &Category) {
        self.by_name
            .entry(name_key(&category.name))
            .or_insert(category.id);
    }

    /// Looks a category up by name, ignoring case and surrounding spaces.
    pub fn get(&self, name: &str) -> Option<CategoryId> {
        self.by_name.get(&name_key(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
