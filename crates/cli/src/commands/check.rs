//! Integrity report for a catalog document.
//!
//! Duplicate product ids break lookups by id and are errors. Category
//! references that do not resolve are tolerated by the API (they are shown as
//! the raw id), so they are only warnings.

use std::path::Path;

use catalog_api::store::JsonFileStore;
use catalog_core::{CatalogDocument, CategoryId, ProductId};
use tracing::{info, warn};

use super::CommandError;

/// Findings of a check run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub products: usize,
    pub categories: usize,
    pub duplicate_ids: Vec<ProductId>,
    pub dangling_references: Vec<(ProductId, CategoryId)>,
}

impl CheckReport {
    /// Build a report for `document`.
    #[must_use]
    pub fn for_document(document: &CatalogDocument) -> Self {
        Self {
            products: document.products.len(),
            categories: document.categories.len(),
            duplicate_ids: document
                .duplicate_product_ids()
                .into_iter()
                .cloned()
                .collect(),
            dangling_references: document
                .dangling_references()
                .into_iter()
                .map(|(p, c)| (p.clone(), c.clone()))
                .collect(),
        }
    }

    /// Whether the document has problems that need fixing.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.duplicate_ids.is_empty()
    }
}

/// Check the document at `file` and log the findings.
///
/// # Errors
///
/// Returns an error if the document cannot be read or parsed.
pub async fn run(file: &Path) -> Result<CheckReport, CommandError> {
    let document = JsonFileStore::new(file).read().await?;
    let report = CheckReport::for_document(&document);

    info!(
        products = report.products,
        categories = report.categories,
        "Checked catalog document"
    );
    for (product, category) in &report.dangling_references {
        warn!(product_id = %product, category_id = %category, "Unknown category reference");
    }
    for id in &report.duplicate_ids {
        tracing::error!(product_id = %id, "Duplicate product id");
    }

    Ok(report)
}
