//! Integration tests for the catalog API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//! ```
//!
//! The tests drive the full router in-process (`tower::ServiceExt::oneshot`)
//! against a catalog document in a temporary directory, so no server or
//! network is required.
//!
//! # Test Categories
//!
//! - `products_api` - Product CRUD over HTTP
//! - `categories_api` - Category listing, health and routing

use std::path::PathBuf;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use catalog_api::{config::CatalogConfig, state::AppState, store::JsonFileStore};
use catalog_core::CatalogDocument;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A response reduced to what tests assert on.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub request_id: Option<String>,
    pub allow_origin: Option<String>,
}

/// A router over a catalog document that lives as long as the context.
pub struct TestContext {
    _dir: TempDir,
    pub data_file: PathBuf,
    app: Router,
}

impl TestContext {
    /// Context over an empty catalog with one category, `c1` / Electronics.
    ///
    /// # Panics
    ///
    /// Panics if the temporary catalog cannot be created.
    pub async fn new() -> Self {
        Self::with_document(serde_json::json!({
            "products": [],
            "categories": [{"id": "c1", "name": "Electronics"}]
        }))
        .await
    }

    /// Context over the given initial document.
    ///
    /// # Panics
    ///
    /// Panics if `document` is not a catalog document or cannot be written.
    pub async fn with_document(document: Value) -> Self {
        Self::build(document, |config| config).await
    }

    /// Context with strict category checking enabled.
    ///
    /// # Panics
    ///
    /// Panics if the temporary catalog cannot be created.
    pub async fn strict(document: Value) -> Self {
        Self::build(document, |config| CatalogConfig {
            strict_categories: true,
            ..config
        })
        .await
    }

    #[allow(clippy::expect_used)]
    async fn build(document: Value, configure: impl FnOnce(CatalogConfig) -> CatalogConfig) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_file = dir.path().join("products.json");

        let document: CatalogDocument =
            serde_json::from_value(document).expect("Invalid catalog document");
        JsonFileStore::new(&data_file)
            .initialize(&document, false)
            .await
            .expect("Failed to write catalog document");

        let config = configure(CatalogConfig {
            data_file: data_file.clone(),
            ..CatalogConfig::default()
        });
        let app = catalog_api::app(AppState::new(config));

        Self {
            _dir: dir,
            data_file,
            app,
        }
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::expect_used)]
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a request with a raw body and explicit content type.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::expect_used)]
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: impl Into<String>,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.into()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Send a prebuilt request.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let allow_origin = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            body,
            request_id,
            allow_origin,
        }
    }

    /// `GET` helper.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    /// `POST` helper.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    /// `PUT` helper.
    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    /// `DELETE` helper.
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Number of products currently persisted.
    ///
    /// # Panics
    ///
    /// Panics if the document cannot be read.
    #[allow(clippy::expect_used)]
    pub async fn product_count(&self) -> usize {
        JsonFileStore::new(&self.data_file)
            .read()
            .await
            .expect("Failed to read catalog document")
            .products
            .len()
    }
}
