//! Product category.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A category products can be filed under.
///
/// Categories are read-only over HTTP; they are managed through the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Create a new category.
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
