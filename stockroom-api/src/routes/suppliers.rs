/// Supplier directory endpoints
///
/// # Endpoints
///
/// - `GET /api/suppliers` - List the directory
/// - `POST /api/suppliers` - Create a supplier
/// - `GET /api/suppliers/:id` - Fetch one supplier (404 when missing)
/// - `PUT /api/suppliers/:id` - Replace the fields
/// - `DELETE /api/suppliers/:id` - Delete a supplier
/// - `GET /api/suppliers/search?name=` - Case-insensitive name search

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use stockroom_shared::models::supplier::{Supplier, SupplierInput};

use super::NameQuery;

/// List handler
pub async fn get_all_suppliers(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = Supplier::list(&state.db).await?;

    Ok(Json(suppliers))
}

/// Lookup handler; a missing supplier is a bare 404
pub async fn get_supplier_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Supplier>> {
    let supplier = Supplier::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(supplier))
}

/// Create handler
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> ApiResult<Json<Supplier>> {
    let supplier = Supplier::create(&state.db, input).await?;

    tracing::info!(supplier_id = supplier.id, "Supplier created");

    Ok(Json(supplier))
}

/// Update handler
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> ApiResult<Json<Supplier>> {
    let supplier = Supplier::update(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Supplier not found".to_string()))?;

    Ok(Json(supplier))
}

/// Delete handler
pub async fn delete_supplier(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    if !Supplier::delete(&state.db, id).await? {
        return Err(ApiError::BadRequest("Supplier not found".to_string()));
    }

    Ok(())
}

/// Name search handler (case-insensitive substring)
pub async fn search_suppliers(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<Vec<Supplier>>> {
    let suppliers = Supplier::find_by_name_contains(&state.db, &query.name).await?;

    Ok(Json(suppliers))
}
