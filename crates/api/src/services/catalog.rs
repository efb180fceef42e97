//! Catalog service: CRUD over the catalog document.
//!
//! Every operation re-reads the document from the store; nothing is cached
//! between calls. Mutations hold `write_lock` for their whole
//! read-modify-write cycle so concurrent requests cannot lose each other's
//! updates. Validation runs before anything is written, so a rejected request
//! never touches the file.

use catalog_core::{
    CatalogDocument, Category, CategoryId, NewProduct, Product, ProductDraft, ProductId,
    ProductPatch, ValidationError,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::instrument;

use super::error::CatalogError;
use crate::store::JsonFileStore;

/// Products and categories returned together for the browsing UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

/// Outcome of [`CatalogService::import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories_inserted: usize,
    pub categories_updated: usize,
    pub products: Vec<Product>,
}

impl From<CatalogDocument> for ProductListing {
    fn from(document: CatalogDocument) -> Self {
        Self {
            products: document.products,
            categories: document.categories,
        }
    }
}

/// Catalog operations backed by a [`JsonFileStore`].
#[derive(Debug)]
pub struct CatalogService {
    store: JsonFileStore,
    write_lock: Mutex<()>,
    strict_categories: bool,
}

impl CatalogService {
    /// Create a new catalog service.
    ///
    /// With `strict_categories`, products may only reference categories that
    /// exist in the document.
    #[must_use]
    pub fn new(store: JsonFileStore, strict_categories: bool) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            strict_categories,
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &JsonFileStore {
        &self.store
    }

    /// All products and all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the document cannot be read.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<ProductListing, CatalogError> {
        Ok(self.store.read().await?.into())
    }

    /// A single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has `id`, or
    /// `CatalogError::Store` if the document cannot be read.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let document = self.store.read().await?;
        document
            .product(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Validate and append a single product, returning it with its new ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for an invalid candidate, or
    /// `CatalogError::Store` if the document cannot be read or written.
    #[instrument(skip(self, candidate))]
    pub async fn create_product(&self, candidate: NewProduct) -> Result<Product, CatalogError> {
        let draft = candidate.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.read().await?;
        self.check_categories(&document, &draft.categories)?;

        let product = draft.into_product(ProductId::generate());
        document.products.push(product.clone());
        self.store.write(&document).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Validate and append several products in one write.
    ///
    /// The batch is all-or-nothing: the first invalid element rejects it and
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` naming the first offending index, or
    /// `CatalogError::Store` if the document cannot be read or written.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub async fn create_products(
        &self,
        candidates: Vec<NewProduct>,
    ) -> Result<Vec<Product>, CatalogError> {
        let drafts = validate_all(candidates)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.read().await?;
        let created = self.append_drafts(&mut document, drafts)?;
        self.store.write(&document).await?;

        tracing::info!(count = created.len(), "Products created");
        Ok(created)
    }

    /// Upsert categories and append products in a single write.
    ///
    /// Every product is validated first; if any is invalid the document is
    /// left exactly as it was, categories included. With strict categories,
    /// products may reference the categories being imported.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` naming the first offending product,
    /// or `CatalogError::Store` if the document cannot be read or written.
    #[instrument(
        skip(self, categories, candidates),
        fields(categories = categories.len(), products = candidates.len())
    )]
    pub async fn import(
        &self,
        categories: Vec<Category>,
        candidates: Vec<NewProduct>,
    ) -> Result<ImportSummary, CatalogError> {
        let drafts = validate_all(candidates)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.read().await?;
        let (categories_inserted, categories_updated) = document.upsert_categories(categories);
        let products = self.append_drafts(&mut document, drafts)?;
        self.store.write(&document).await?;

        let summary = ImportSummary {
            categories_inserted,
            categories_updated,
            products,
        };
        tracing::info!(
            categories_inserted,
            categories_updated,
            products_created = summary.products.len(),
            "Catalog imported"
        );
        Ok(summary)
    }

    /// Shallow-merge `patch` over an existing product. The ID never changes.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has `id`,
    /// `CatalogError::Validation` if a submitted field is invalid, or
    /// `CatalogError::Store` if the document cannot be read or written.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.read().await?;

        let updated = document
            .product(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?
            .merged(patch)?;
        self.check_categories(&document, &updated.categories)?;

        if let Some(slot) = document.products.iter_mut().find(|p| &p.id == id) {
            slot.clone_from(&updated);
        }
        self.store.write(&document).await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Remove a product, returning its last state.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has `id`, or
    /// `CatalogError::Store` if the document cannot be read or written.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.store.read().await?;

        let index = document
            .product_index(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let removed = document.products.remove(index);
        self.store.write(&document).await?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(removed)
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if the document cannot be read.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.read().await?.categories)
    }

    fn append_drafts(
        &self,
        document: &mut CatalogDocument,
        drafts: Vec<ProductDraft>,
    ) -> Result<Vec<Product>, CatalogError> {
        for (i, draft) in drafts.iter().enumerate() {
            self.check_categories(document, &draft.categories)
                .map_err(|e| CatalogError::at_index(i, e))?;
        }

        let created: Vec<Product> = drafts
            .into_iter()
            .map(|draft| draft.into_product(ProductId::generate()))
            .collect();
        document.products.extend(created.iter().cloned());
        Ok(created)
    }

    fn check_categories(
        &self,
        document: &CatalogDocument,
        categories: &[CategoryId],
    ) -> Result<(), ValidationError> {
        if !self.strict_categories {
            return Ok(());
        }
        match categories.iter().find(|id| document.category(id).is_none()) {
            Some(unknown) => Err(ValidationError::UnknownCategory(unknown.clone())),
            None => Ok(()),
        }
    }
}

/// Validate a batch, naming the first offending index.
fn validate_all(candidates: Vec<NewProduct>) -> Result<Vec<ProductDraft>, CatalogError> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| {
            candidate
                .validate()
                .map_err(|e| CatalogError::at_index(i, e))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::*;
    use crate::store::StoreError;

    async fn service(strict: bool) -> (TempDir, CatalogService) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        store
            .initialize(
                &CatalogDocument::with_categories(vec![Category::new("c1", "Electronics")]),
                false,
            )
            .await
            .unwrap();
        (dir, CatalogService::new(store, strict))
    }

    fn candidate(name: &str) -> NewProduct {
        NewProduct {
            name: Some(name.to_string()),
            price: Some(Decimal::from(999)),
            description: Some(format!("A {name}")),
            categories: Some(vec![CategoryId::new("c1")]),
        }
    }

    async fn product_count(service: &CatalogService) -> usize {
        service.list_products().await.unwrap().products.len()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (_dir, service) = service(false).await;
        let created = service.create_product(candidate("Phone")).await.unwrap();

        assert_eq!(created.name, "Phone");
        assert_eq!(created.price.amount(), Decimal::from(999));
        assert_eq!(created.description, "A Phone");
        assert_eq!(created.categories, vec![CategoryId::new("c1")]);
        assert_eq!(service.get_product(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_invalid_leaves_document_unchanged() {
        let (_dir, service) = service(false).await;
        for missing in ["name", "price", "description", "categories"] {
            let mut c = candidate("Phone");
            match missing {
                "name" => c.name = None,
                "price" => c.price = None,
                "description" => c.description = Some(String::new()),
                _ => c.categories = Some(vec![]),
            }
            let err = service.create_product(c).await.unwrap_err();
            assert!(
                matches!(&err, CatalogError::Validation { index: None, source: ValidationError::MissingField(f) } if *f == missing),
                "unexpected error for {missing}: {err}"
            );
        }
        assert_eq!(product_count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_batch_create_assigns_distinct_ids_in_order() {
        let (_dir, service) = service(false).await;
        service.create_product(candidate("Existing")).await.unwrap();

        let created = service
            .create_products(vec![candidate("A"), candidate("B"), candidate("C")])
            .await
            .unwrap();

        let ids: HashSet<_> = created.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 3);

        let listing = service.list_products().await.unwrap();
        let names: Vec<_> = listing.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Existing", "A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_batch_with_invalid_element_is_rejected_whole() {
        let (_dir, service) = service(false).await;
        let mut bad = candidate("Bad");
        bad.price = None;

        let err = service
            .create_products(vec![candidate("A"), bad, candidate("C")])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { index: Some(1), .. }));
        assert_eq!(product_count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let (_dir, service) = service(false).await;
        assert!(service.create_products(vec![]).await.unwrap().is_empty());
        assert_eq!(product_count(&service).await, 0);
    }

    #[tokio::test]
    async fn test_update_price_only() {
        let (_dir, service) = service(false).await;
        let created = service.create_product(candidate("Phone")).await.unwrap();

        let patch = ProductPatch {
            price: Some(Decimal::from(500)),
            ..ProductPatch::default()
        };
        let updated = service.update_product(&created.id, patch).await.unwrap();

        assert_eq!(updated.price.amount(), Decimal::from(500));
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.categories, created.categories);
        assert_eq!(service.get_product(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (_dir, service) = service(false).await;
        let err = service
            .update_product(&ProductId::new("nope"), ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_and_returns_prior_state() {
        let (_dir, service) = service(false).await;
        let keep = service.create_product(candidate("Keep")).await.unwrap();
        let gone = service.create_product(candidate("Gone")).await.unwrap();

        let removed = service.delete_product(&gone.id).await.unwrap();
        assert_eq!(removed, gone);
        assert!(matches!(
            service.get_product(&gone.id).await,
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(product_count(&service).await, 1);
        assert!(service.get_product(&keep.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, service) = service(false).await;
        service.create_product(candidate("Keep")).await.unwrap();

        let err = service
            .delete_product(&ProductId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(product_count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_permissive_mode_accepts_unknown_categories() {
        let (_dir, service) = service(false).await;
        let mut c = candidate("Phone");
        c.categories = Some(vec![CategoryId::new("missing")]);
        assert!(service.create_product(c).await.is_ok());
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_unknown_categories() {
        let (_dir, service) = service(true).await;
        let mut c = candidate("Phone");
        c.categories = Some(vec![CategoryId::new("c1"), CategoryId::new("missing")]);

        let err = service.create_product(c.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Validation {
                source: ValidationError::UnknownCategory(_),
                ..
            }
        ));

        let err = service
            .create_products(vec![candidate("Ok"), c])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation { index: Some(1), .. }));

        let created = service.create_product(candidate("Ok")).await.unwrap();
        let patch = ProductPatch {
            categories: Some(vec![CategoryId::new("missing")]),
            ..ProductPatch::default()
        };
        assert!(service.update_product(&created.id, patch).await.is_err());
        assert_eq!(
            service.get_product(&created.id).await.unwrap().categories,
            vec![CategoryId::new("c1")]
        );
        assert_eq!(product_count(&service).await, 1);
    }

    #[tokio::test]
    async fn test_list_categories() {
        let (_dir, service) = service(false).await;
        let categories = service.list_categories().await.unwrap();
        assert_eq!(categories, vec![Category::new("c1", "Electronics")]);
    }

    #[tokio::test]
    async fn test_import_upserts_categories_and_creates_products() {
        let (_dir, service) = service(true).await;
        let summary = service
            .import(
                vec![Category::new("c1", "Gadgets"), Category::new("c2", "Books")],
                vec![candidate("Phone"), {
                    let mut novel = candidate("Novel");
                    novel.categories = Some(vec!["c2".into()]);
                    novel
                }],
            )
            .await
            .unwrap();

        assert_eq!((summary.categories_inserted, summary.categories_updated), (1, 1));
        assert_eq!(summary.products.len(), 2);
        let categories = service.list_categories().await.unwrap();
        assert_eq!(categories[0], Category::new("c1", "Gadgets"));
        assert_eq!(product_count(&service).await, 2);
    }

    #[tokio::test]
    async fn test_import_with_invalid_product_writes_nothing() {
        let (_dir, service) = service(false).await;
        let before = service.store().read().await.unwrap();

        let mut broken = candidate("Broken");
        broken.description = None;
        let err = service
            .import(
                vec![Category::new("c9", "Garden")],
                vec![candidate("Phone"), broken],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::Validation { index: Some(1), .. }
        ));
        assert_eq!(service.store().read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_missing_file_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = CatalogService::new(JsonFileStore::new(dir.path().join("missing.json")), false);

        assert!(matches!(
            service.list_products().await,
            Err(CatalogError::Store(StoreError::Io { .. }))
        ));
        assert!(matches!(
            service.create_product(candidate("Phone")).await,
            Err(CatalogError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, service) = service(false).await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.create_product(candidate(&format!("P{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(product_count(&service).await, 20);
    }
}
