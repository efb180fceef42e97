//! Business logic services.
//!
//! - [`catalog`] - Read-modify-write operations over the catalog document

pub mod catalog;
pub mod error;

pub use catalog::{CatalogService, ImportSummary, ProductListing};
pub use error::CatalogError;
