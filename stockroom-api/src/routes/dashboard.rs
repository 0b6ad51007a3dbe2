/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard/stats
/// ```
///
/// # Response
///
/// ```json
/// {
///   "totalProducts": 3,
///   "lowStockCount": 1,
///   "totalSuppliers": 2,
///   "totalUsers": 3
/// }
/// ```
///
/// The four counts are independent queries, not one snapshot; the dashboard
/// is a coarse overview, not an audit surface.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use stockroom_shared::models::{product::Product, supplier::Supplier, user::User};

/// Aggregate counts across the catalogue, directory, and accounts
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock_count: i64,
    pub total_suppliers: i64,
    pub total_users: i64,
}

/// Dashboard stats handler
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<DashboardStats>> {
    let total_products = Product::count(&state.db).await?;
    let low_stock_count = Product::count_low_stock(&state.db).await?;
    let total_suppliers = Supplier::count(&state.db).await?;
    let total_users = User::count(&state.db).await?;

    Ok(Json(DashboardStats {
        total_products,
        low_stock_count,
        total_suppliers,
        total_users,
    }))
}
