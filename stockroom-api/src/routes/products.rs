/// Inventory catalogue endpoints
///
/// # Endpoints
///
/// - `GET /api/products` - List the catalogue
/// - `POST /api/products?username=` - Create a product owned by that user
/// - `GET /api/products/:id` - Fetch one product (404 when missing)
/// - `PUT /api/products/:id?username=` - Replace the editable fields
/// - `DELETE /api/products/:id` - Delete a product
/// - `GET /api/products/category/:category` - Filter by exact category
/// - `GET /api/products/search?name=` - Case-insensitive name search
/// - `GET /api/products/low-stock` - Products at or below their threshold

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use stockroom_shared::auth::identity;
use stockroom_shared::models::product::{Product, ProductInput};

use super::{ActorQuery, NameQuery};

/// List handler
pub async fn get_all_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::list(&state.db).await?;

    Ok(Json(products))
}

/// Lookup handler; a missing product is a bare 404
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Product>> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(product))
}

/// Create handler
///
/// The creating user is resolved from `?username=` and recorded as the
/// product's owner.
pub async fn create_product(
    State(state): State<AppState>,
    Query(actor): Query<ActorQuery>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Json<Product>> {
    let user = identity::resolve(&state.db, &actor.username).await?;
    let product = Product::create(&state.db, input, user.id).await?;

    tracing::info!(product_id = product.id, owner = %user.username, "Product created");

    Ok(Json(product))
}

/// Update handler
///
/// `?username=` is required by the route contract but any resolvable or
/// unresolvable value is accepted; ownership never changes on update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    _actor: Query<ActorQuery>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Json<Product>> {
    let product = Product::update(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Delete handler
pub async fn delete_product(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    if !Product::delete(&state.db, id).await? {
        return Err(ApiError::BadRequest("Product not found".to_string()));
    }

    Ok(())
}

/// Category filter handler (exact match)
pub async fn get_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::find_by_category(&state.db, &category).await?;

    Ok(Json(products))
}

/// Name search handler (case-insensitive substring)
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::find_by_name_contains(&state.db, &query.name).await?;

    Ok(Json(products))
}

/// Low-stock view handler (`stock <= low_stock_threshold`)
pub async fn get_low_stock_products(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::find_low_stock(&state.db).await?;

    Ok(Json(products))
}
