//! Create an empty catalog document.

use std::path::Path;

use catalog_api::store::JsonFileStore;
use catalog_core::CatalogDocument;
use tracing::info;

use super::CommandError;

/// Write `{"products": [], "categories": []}` to `file`.
///
/// # Errors
///
/// Returns `StoreError::AlreadyExists` (wrapped) if the file exists and
/// `force` is false, or an I/O error if it cannot be written.
pub async fn run(file: &Path, force: bool) -> Result<(), CommandError> {
    let store = JsonFileStore::new(file);
    store.initialize(&CatalogDocument::default(), force).await?;
    info!(path = %file.display(), "Catalog document initialized");
    Ok(())
}
