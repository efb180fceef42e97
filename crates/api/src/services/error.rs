//! Catalog service errors.

use catalog_core::{ProductId, ValidationError};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A submitted record failed validation. `index` is set for batch input.
    #[error("{}", describe_validation(*.index, .source))]
    Validation {
        index: Option<usize>,
        #[source]
        source: ValidationError,
    },

    /// No product has the given ID.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The catalog document could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationError> for CatalogError {
    fn from(source: ValidationError) -> Self {
        Self::Validation {
            index: None,
            source,
        }
    }
}

impl CatalogError {
    /// Validation failure for the batch element at `index`.
    #[must_use]
    pub const fn at_index(index: usize, source: ValidationError) -> Self {
        Self::Validation {
            index: Some(index),
            source,
        }
    }
}

fn describe_validation(index: Option<usize>, source: &ValidationError) -> String {
    match index {
        Some(i) => format!("product #{i}: {source}"),
        None => source.to_string(),
    }
}
