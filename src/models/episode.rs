//! Episode model for harvested podcast listings.

use serde::{Deserialize, Serialize};

/// Placeholder for an episode without a readable title.
pub const NO_TITLE: &str = "No title";
/// Placeholder for an episode without a readable description.
pub const NO_DESCRIPTION: &str = "No description";
/// Placeholder for an episode without a readable date.
pub const NO_DATE: &str = "No date";
/// Placeholder for an episode without a recognizable duration.
pub const NO_DURATION: &str = "No duration";

/// A single episode as it appears on the listing page.
///
/// Episodes have no identifier of their own. Their position in the result
/// sequence is their identity, so every observed element produces exactly one
/// record and unreadable fields fall back to placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub description: String,
    pub date: String,
    pub duration: String,
}

impl Episode {
    /// Build an episode from optional field values, substituting placeholders.
    pub fn from_parts(
        title: Option<String>,
        description: Option<String>,
        date: Option<String>,
        duration: Option<String>,
    ) -> Self {
        Self {
            title: non_empty_or(title, NO_TITLE),
            description: non_empty_or(description, NO_DESCRIPTION),
            date: non_empty_or(date, NO_DATE),
            duration: non_empty_or(duration, NO_DURATION),
        }
    }
}

fn non_empty_or(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}
