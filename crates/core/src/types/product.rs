//! Products and the request shapes used to create and update them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::{Price, PriceError};

/// Errors raised when a product candidate or patch fails validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent, blank, or an empty list.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The price is not a valid amount.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A category reference does not resolve (strict mode only).
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),
}

/// A product as stored in the catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub categories: Vec<CategoryId>,
}

/// A creation candidate as submitted by a client.
///
/// Every field is optional so that an incomplete body reaches validation
/// instead of failing deserialization. Unknown keys, including `id`, are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: Option<String>,
    #[serde(default, with = "super::price::json_number::option")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub categories: Option<Vec<CategoryId>>,
}

/// A validated creation candidate, waiting for an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub categories: Vec<CategoryId>,
}

/// Partial update body. Present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, with = "super::price::json_number::option")]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub categories: Option<Vec<CategoryId>>,
}

fn require_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn require_categories(value: Option<Vec<CategoryId>>) -> Result<Vec<CategoryId>, ValidationError> {
    match value {
        Some(categories) if !categories.is_empty() => Ok(categories),
        _ => Err(ValidationError::MissingField("categories")),
    }
}

impl NewProduct {
    /// Check field presence and turn the candidate into a draft.
    ///
    /// Fields are checked in the order name, price, description, categories;
    /// the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` for an absent or blank field and
    /// `ValidationError::Price` for a negative price.
    pub fn validate(self) -> Result<ProductDraft, ValidationError> {
        let name = require_text(self.name, "name")?;
        let price = Price::new(self.price.ok_or(ValidationError::MissingField("price"))?)?;
        let description = require_text(self.description, "description")?;
        let categories = require_categories(self.categories)?;

        Ok(ProductDraft {
            name,
            price,
            description,
            categories,
        })
    }
}

impl ProductDraft {
    /// Attach an ID, producing a storable product.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            categories: self.categories,
        }
    }
}

impl Product {
    /// Shallow-merge a patch over this product.
    ///
    /// The ID is never changed. Fields present in the patch are validated with
    /// the same rules as creation.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a present field is blank or the price is
    /// negative. `self` is left untouched on error.
    pub fn merged(&self, patch: ProductPatch) -> Result<Self, ValidationError> {
        let mut merged = self.clone();
        if patch.name.is_some() {
            merged.name = require_text(patch.name, "name")?;
        }
        if let Some(amount) = patch.price {
            merged.price = Price::new(amount)?;
        }
        if patch.description.is_some() {
            merged.description = require_text(patch.description, "description")?;
        }
        if patch.categories.is_some() {
            merged.categories = require_categories(patch.categories)?;
        }
        Ok(merged)
    }
}
