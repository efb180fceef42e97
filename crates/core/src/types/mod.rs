//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod document;
pub mod id;
pub mod price;
pub mod product;

pub use category::Category;
pub use document::CatalogDocument;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, ProductDraft, ProductPatch, ValidationError};
