//! Frontend Models
//!
//! Data structures matching the sub-category API responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sub-category id as sent by the backend: a number, or a string for
/// backends that serialize keys as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionId {
    Int(i64),
    Text(String),
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionId::Int(id) => write!(f, "{}", id),
            OptionId::Text(id) => f.write_str(id),
        }
    }
}

/// One selectable sub-category. Only what the option needs is read; the
/// rest of the serializer's fields are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: OptionId,
    pub name: String,
}

impl SubCategory {
    pub fn new(id: impl Into<OptionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Value attribute for the rendered `<option>`
    pub fn option_value(&self) -> String {
        self.id.to_string()
    }
}

impl From<i64> for OptionId {
    fn from(id: i64) -> Self {
        OptionId::Int(id)
    }
}

impl From<i32> for OptionId {
    fn from(id: i32) -> Self {
        OptionId::Int(id.into())
    }
}

impl From<&str> for OptionId {
    fn from(id: &str) -> Self {
        OptionId::Text(id.to_string())
    }
}

/// Pagination envelope emitted by list views with a paginator configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<SubCategory>,
}

/// Either response shape the endpoint may return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubCategoryPayload {
    Bare(Vec<SubCategory>),
    Paginated(SubCategoryPage),
}

impl SubCategoryPayload {
    /// Link to the following page, if any
    pub fn next_page(&self) -> Option<&str> {
        match self {
            SubCategoryPayload::Bare(_) => None,
            SubCategoryPayload::Paginated(page) => page.next.as_deref(),
        }
    }

    pub fn into_options(self) -> Vec<SubCategory> {
        match self {
            SubCategoryPayload::Bare(options) => options,
            SubCategoryPayload::Paginated(page) => page.results,
        }
    }
}

/// Current values of the two form fields. Empty string means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub main_category: String,
    pub sub_category: String,
}

impl SelectionState {
    /// Main category id to scope by, if any
    pub fn scope(&self) -> Option<&str> {
        non_empty(&self.main_category)
    }

    /// Sub-category id worth reselecting after a refresh, if any
    pub fn previous_sub(&self) -> Option<&str> {
        non_empty(&self.sub_category)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
