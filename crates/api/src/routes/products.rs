//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use catalog_core::{NewProduct, Product, ProductId, ProductPatch};
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::{AppError, Result, add_breadcrumb},
    services::{CatalogError, ProductListing},
    state::AppState,
};

/// `GET /products` - all products plus all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<ProductListing>> {
    Ok(Json(state.catalog().list_products().await?))
}

/// `GET /products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(state.catalog().get_product(&id).await?))
}

/// `POST /products` - create one product.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(candidate) = body?;
    let product = state.catalog().create_product(candidate).await?;

    add_breadcrumb(
        "catalog",
        "Product created",
        Some(&[("product_id", product.id.as_str())]),
    );
    Ok((StatusCode::CREATED, Json(product)))
}

/// `POST /products/batch` - create many products, all or nothing.
///
/// The body must be a JSON array. Each element is decoded and validated
/// before the next one is looked at, so the error always names the earliest
/// bad element, whether it is malformed or merely incomplete.
#[instrument(skip(state, body))]
pub async fn create_batch(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Product>>)> {
    let Json(body) = body?;
    let Value::Array(items) = body else {
        return Err(AppError::BadRequest(
            "expected an array of products".to_string(),
        ));
    };

    let mut candidates = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let candidate = serde_json::from_value::<NewProduct>(item)
            .map_err(|e| AppError::BadRequest(format!("product #{i}: {e}")))?;
        candidate
            .clone()
            .validate()
            .map_err(|e| CatalogError::at_index(i, e))?;
        candidates.push(candidate);
    }

    let created = state.catalog().create_products(candidates).await?;

    let count = created.len().to_string();
    add_breadcrumb("catalog", "Products created", Some(&[("count", count.as_str())]));
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /products/{id}` - merge submitted fields over an existing product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    body: std::result::Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>> {
    let Json(patch) = body?;
    let product = state.catalog().update_product(&id, patch).await?;

    add_breadcrumb(
        "catalog",
        "Product updated",
        Some(&[("product_id", id.as_str())]),
    );
    Ok(Json(product))
}

/// `DELETE /products/{id}` - remove a product and return its last state.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.catalog().delete_product(&id).await?;

    add_breadcrumb(
        "catalog",
        "Product deleted",
        Some(&[("product_id", id.as_str())]),
    );
    Ok(Json(product))
}
