//! Category route handlers. Categories are read-only over HTTP.

use axum::{Json, extract::State};
use catalog_core::Category;
use tracing::instrument;

use crate::{error::Result, state::AppState};

/// `GET /categories`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.catalog().list_categories().await?))
}
