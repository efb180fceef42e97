//! File-backed storage for the catalog document.
//!
//! # Layout
//!
//! One pretty-printed JSON file:
//!
//! ```json
//! {
//!   "products": [ { "id": "...", "name": "...", "price": 999, "description": "...", "categories": ["c1"] } ],
//!   "categories": [ { "id": "c1", "name": "Electronics" } ]
//! }
//! ```
//!
//! The store has no query capability: it reads or writes the whole document.
//! Writes go to a sibling temporary file that is renamed over the target, so
//! the file on disk is always either the old or the new document.
//!
//! Reading is strict. A single product with a missing field or a value of
//! the wrong type (`"price": ""`) makes the whole document unreadable; the
//! error names that product so it can be fixed by hand. Keys outside the
//! product and category shapes are not kept and disappear on the next write.

use std::io;
use std::path::{Path, PathBuf};

use catalog_core::{CatalogDocument, Product};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read, written or renamed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but does not contain a valid catalog document.
    #[error("corrupt catalog document {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// One product entry does not have the product shape.
    #[error("invalid product {product} in {}: {source}", .path.display())]
    InvalidProduct {
        path: PathBuf,
        /// The entry's `id`, or `#<index>` when it has none.
        product: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize catalog document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Refused to overwrite an existing document.
    #[error("catalog document already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

/// Whole-document JSON file store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the document at `path`. The file is not touched.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read and parse the full document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file is missing or unreadable and
    /// `StoreError::InvalidProduct` or `StoreError::Corrupt` if it is not a
    /// valid catalog document.
    pub async fn read(&self) -> Result<CatalogDocument, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        serde_json::from_slice(&bytes).map_err(|source| {
            let err = self.locate_invalid_product(&bytes).unwrap_or(StoreError::Corrupt {
                path: self.path.clone(),
                source,
            });
            tracing::warn!(error = %err, "Catalog document is unreadable");
            err
        })
    }

    /// Replace the full document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialize` if the document cannot be encoded and
    /// `StoreError::Io` if the temporary file cannot be written or renamed.
    /// On error the previous document is left in place.
    pub async fn write(&self, document: &CatalogDocument) -> Result<(), StoreError> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(StoreError::Serialize)?;
        bytes.push(b'\n');

        let tmp = self.temp_path();
        if let Err(source) = tokio::fs::write(&tmp, &bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io { path: tmp, source });
        }

        if let Err(source) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(source));
        }

        tracing::debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            products = document.products.len(),
            "Catalog document written"
        );
        Ok(())
    }

    /// Create the backing file (and parent directories) with `document`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the file exists and `overwrite`
    /// is false, or `StoreError::Io` if it cannot be created.
    pub async fn initialize(
        &self,
        document: &CatalogDocument,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        if !overwrite && self.exists().await {
            return Err(StoreError::AlreadyExists(self.path.clone()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        self.write(document).await
    }

    /// Find the first entry of `products` that is not a valid product.
    fn locate_invalid_product(&self, bytes: &[u8]) -> Option<StoreError> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        let products = value.get("products")?.as_array()?;

        products.iter().enumerate().find_map(|(i, entry)| {
            let source = serde_json::from_value::<Product>(entry.clone()).err()?;
            let product = entry
                .get("id")
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("#{i}"), String::from);
            Some(StoreError::InvalidProduct {
                path: self.path.clone(),
                product,
                source,
            })
        })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "catalog".into(), |n| n.to_string_lossy());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_core::{Category, NewProduct, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn document() -> CatalogDocument {
        let mut doc = CatalogDocument::with_categories(vec![Category::new("c1", "Electronics")]);
        let draft = NewProduct {
            name: Some("Phone".into()),
            price: Some(Decimal::new(99_999, 2)),
            description: Some("A phone".into()),
            categories: Some(vec!["c1".into()]),
        }
        .validate()
        .unwrap();
        doc.products.push(draft.into_product(ProductId::new("p1")));
        doc
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));

        let doc = document();
        store.write(&doc).await.unwrap();
        assert_eq!(store.read().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));
        assert!(matches!(store.read().await, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_read_malformed_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(store.read().await, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_read_names_invalid_product() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        tokio::fs::write(
            &path,
            br#"{"products": [
                {"id": "p1", "name": "Phone", "price": 1, "description": "A phone", "categories": ["c1"]},
                {"id": "legacy-7", "name": "Old", "price": "", "description": "Old", "categories": ["c1"]}
            ]}"#,
        )
        .await
        .unwrap();

        let err = JsonFileStore::new(path).read().await.unwrap_err();
        assert!(
            matches!(&err, StoreError::InvalidProduct { product, .. } if product == "legacy-7"),
            "{err}"
        );
        assert!(err.to_string().contains("legacy-7"));
    }

    #[tokio::test]
    async fn test_read_names_invalid_product_without_id_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        tokio::fs::write(&path, br#"{"products": [{"name": "No id"}]}"#)
            .await
            .unwrap();

        let err = JsonFileStore::new(path).read().await.unwrap_err();
        assert!(matches!(&err, StoreError::InvalidProduct { product, .. } if product == "#0"));
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        store.write(&document()).await.unwrap();
        store.write(&CatalogDocument::default()).await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["products.json".to_string()]);
    }

    #[tokio::test]
    async fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope").join("products.json"));
        assert!(matches!(
            store.write(&document()).await,
            Err(StoreError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_initialize_creates_parents_and_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data").join("products.json"));

        store.initialize(&document(), false).await.unwrap();
        assert!(store.exists().await);

        let again = store.initialize(&CatalogDocument::default(), false).await;
        assert!(matches!(again, Err(StoreError::AlreadyExists(_))));
        assert_eq!(store.read().await.unwrap().products.len(), 1);

        store
            .initialize(&CatalogDocument::default(), true)
            .await
            .unwrap();
        assert!(store.read().await.unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        store.write(&document()).await.unwrap();

        let text = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(text.starts_with("{\n  \"products\""));
        assert!(text.ends_with("}\n"));
    }
}
