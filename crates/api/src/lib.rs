//! Catalog API library.
//!
//! This crate provides the catalog REST API as a library, allowing it to be
//! tested in-process and reused by the CLI.
//!
//! - [`store`] - Whole-document JSON file persistence
//! - [`services`] - Catalog operations (read-modify-write under a single writer lock)
//! - [`routes`] - Axum handlers and the application router

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use routes::app;
