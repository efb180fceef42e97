//! The catalog document: the single persisted JSON structure.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::{CategoryId, ProductId};
use super::product::Product;

/// All products and categories, serialized as
/// `{"products": [...], "categories": [...]}`.
///
/// A missing key is read as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CatalogDocument {
    /// Create a document with no products.
    #[must_use]
    pub const fn with_categories(categories: Vec<Category>) -> Self {
        Self {
            products: Vec::new(),
            categories,
        }
    }

    /// Find a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Position of a product in the products sequence.
    #[must_use]
    pub fn product_index(&self, id: &ProductId) -> Option<usize> {
        self.products.iter().position(|p| &p.id == id)
    }

    /// Find a category by ID.
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Display label for a category reference.
    ///
    /// Broken references fall back to the raw identifier.
    #[must_use]
    pub fn category_label<'a>(&'a self, id: &'a CategoryId) -> &'a str {
        self.category(id).map_or_else(|| id.as_str(), |c| c.name.as_str())
    }

    /// Category references that do not resolve, as `(product, category)` pairs
    /// in document order.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<(&ProductId, &CategoryId)> {
        let known: HashSet<&CategoryId> = self.categories.iter().map(|c| &c.id).collect();
        self.products
            .iter()
            .flat_map(|p| p.categories.iter().map(move |c| (&p.id, c)))
            .filter(|(_, c)| !known.contains(c))
            .collect()
    }

    /// Product IDs that occur more than once, each reported once.
    #[must_use]
    pub fn duplicate_product_ids(&self) -> Vec<&ProductId> {
        let mut seen: HashMap<&ProductId, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for product in &self.products {
            let count = seen.entry(&product.id).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(&product.id);
            }
        }
        duplicates
    }

    /// Insert or replace categories by ID, keeping document order for
    /// existing entries and appending new ones.
    ///
    /// Returns `(inserted, updated)` counts.
    pub fn upsert_categories(&mut self, categories: impl IntoIterator<Item = Category>) -> (usize, usize) {
        let mut inserted = 0;
        let mut updated = 0;
        for category in categories {
            if let Some(existing) = self.categories.iter_mut().find(|c| c.id == category.id) {
                existing.name = category.name;
                updated += 1;
            } else {
                self.categories.push(category);
                inserted += 1;
            }
        }
        (inserted, updated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> CatalogDocument {
        serde_json::from_value(json!({
            "products": [
                {"id": "p1", "name": "Phone", "price": 999, "description": "A phone", "categories": ["c1", "gone"]},
                {"id": "p2", "name": "Case", "price": 19.99, "description": "A case", "categories": ["c1"]},
                {"id": "p1", "name": "Dup", "price": 1, "description": "Dup", "categories": ["c2"]}
            ],
            "categories": [
                {"id": "c1", "name": "Electronics"},
                {"id": "c2", "name": "Accessories"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let doc: CatalogDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.products.is_empty());
        assert!(doc.categories.is_empty());
    }

    #[test]
    fn test_category_label_falls_back_to_raw_id() {
        let doc = sample();
        assert_eq!(doc.category_label(&CategoryId::new("c1")), "Electronics");
        let missing = CategoryId::new("gone");
        assert_eq!(doc.category_label(&missing), "gone");
    }

    #[test]
    fn test_dangling_references() {
        let doc = sample();
        let dangling = doc.dangling_references();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].0.as_str(), "p1");
        assert_eq!(dangling[0].1.as_str(), "gone");
    }

    #[test]
    fn test_duplicate_product_ids() {
        let doc = sample();
        let dups = doc.duplicate_product_ids();
        assert_eq!(dups, vec![&ProductId::new("p1")]);
    }

    #[test]
    fn test_product_lookup() {
        let doc = sample();
        assert_eq!(doc.product_index(&ProductId::new("p2")), Some(1));
        assert!(doc.product(&ProductId::new("nope")).is_none());
    }

    #[test]
    fn test_upsert_categories() {
        let mut doc = sample();
        let (inserted, updated) = doc.upsert_categories([
            Category::new("c1", "Gadgets"),
            Category::new("c3", "Books"),
        ]);
        assert_eq!((inserted, updated), (1, 1));
        assert_eq!(doc.categories[0].name, "Gadgets");
        assert_eq!(doc.categories[2].id.as_str(), "c3");
    }

    #[test]
    fn test_round_trip() {
        let doc = sample();
        let text = serde_json::to_string_pretty(&doc).unwrap();
        let back: CatalogDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
