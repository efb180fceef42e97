//! Seed the catalog from a YAML or JSON file.
//!
//! ```yaml
//! categories:
//!   - id: c1
//!     name: Electronics
//! products:
//!   - name: Phone
//!     price: 999
//!     description: A phone
//!     categories: [c1]
//! ```
//!
//! Categories are upserted by ID and products go through the same validation
//! as `POST /products/batch`. Both land in a single write: if any product is
//! invalid the document is left untouched, categories included.

use std::path::Path;

use catalog_core::{Category, NewProduct};
use serde::Deserialize;
use tracing::info;

use super::{CommandError, open_catalog};

/// Seed file contents. Both lists are optional.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<NewProduct>,
}

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_inserted: usize,
    pub categories_updated: usize,
    pub products_created: usize,
}

/// Parse a seed file. YAML is a superset of JSON, so both are accepted.
///
/// # Errors
///
/// Returns `CommandError::SeedRead` or `CommandError::SeedParse`.
pub async fn load(path: &Path) -> Result<SeedFile, CommandError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;

    serde_yaml::from_str(&content).map_err(|source| CommandError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply the seed file at `seed_path` to the catalog document at `file`.
///
/// # Errors
///
/// Returns an error if the seed file is unreadable or invalid, if any product
/// fails validation, or if the document cannot be read or written.
pub async fn run(file: &Path, seed_path: &Path) -> Result<SeedSummary, CommandError> {
    info!(path = %seed_path.display(), "Loading seed file");
    let seed = load(seed_path).await?;
    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Parsed seed file"
    );

    let catalog = open_catalog(file);

    let imported = catalog.import(seed.categories, seed.products).await?;

    let summary = SeedSummary {
        categories_inserted: imported.categories_inserted,
        categories_updated: imported.categories_updated,
        products_created: imported.products.len(),
    };

    info!("Seeding complete!");
    info!("  Categories inserted: {}", summary.categories_inserted);
    info!("  Categories updated: {}", summary.categories_updated);
    info!("  Products created: {}", summary.products_created);

    Ok(summary)
}
