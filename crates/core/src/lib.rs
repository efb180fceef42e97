//! Catalog Core - Shared types library.
//!
//! This crate provides the domain types used across all catalog components:
//! - `api` - The JSON REST API over the catalog document
//! - `cli` - Command-line tools for initializing, seeding and checking a catalog
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP, no
//! file access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, products, categories and the catalog document

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
