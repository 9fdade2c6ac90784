//! Product API Handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::catalog::{ProductForm, ProductWithVariants};
use crate::core::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Currency for price annotations; the configured default when absent.
    pub currency: Option<String>,
}

/// GET /api/products - all products with their variant sets
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ProductWithVariants>>> {
    let products = state.catalog.list(query.currency.as_deref()).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - one product with its variant set
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ProductWithVariants>> {
    let product = state.catalog.get(id, query.currency.as_deref()).await?;
    Ok(Json(product))
}

/// POST /api/products - create a product from a multipart form
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProductWithVariants>)> {
    let form = ProductForm::from_multipart(multipart).await?;
    let (payload, uploads) = form.into_create()?;
    let product = state.catalog.create(payload, uploads).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products - update a product; the form carries the `id` field
pub async fn update(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> AppResult<Json<ProductWithVariants>> {
    let form = ProductForm::from_multipart(multipart).await?;
    let (payload, uploads) = form.into_update()?;
    let product = state.catalog.update(payload, uploads).await?;
    Ok(Json(product))
}

/// GET /api/products/:id/match?Level_1=Red&Level_2=M - resolve a full
/// attribute selection to its variant; `null` when nothing matches
pub async fn match_variant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(selection): Query<std::collections::BTreeMap<String, String>>,
) -> AppResult<Json<Option<shared::models::Variant>>> {
    let variant = state.catalog.match_variant(id, &selection).await?;
    Ok(Json(variant))
}

/// DELETE /api/products/:id - remove a product, its variants and media
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/products/:id/variants/:variant_id - remove one variant
pub async fn delete_variant(
    State(state): State<ServerState>,
    Path((id, variant_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    state.catalog.delete_variant(id, variant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
