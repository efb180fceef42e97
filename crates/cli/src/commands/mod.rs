//! CLI subcommands.

pub mod check;
pub mod init;
pub mod list;
pub mod seed;

use std::path::{Path, PathBuf};

use catalog_api::services::{CatalogError, CatalogService};
use catalog_api::store::{JsonFileStore, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Seed file could not be read.
    #[error("failed to read seed file {}: {source}", .path.display())]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid YAML/JSON of the expected shape.
    #[error("invalid seed file {}: {source}", .path.display())]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Open a catalog service over the document at `file`.
///
/// Strict category checking is off: seed files may reference categories that
/// `check` later reports as dangling.
fn open_catalog(file: &Path) -> CatalogService {
    CatalogService::new(JsonFileStore::new(file), false)
}
