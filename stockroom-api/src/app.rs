/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use stockroom_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = stockroom_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check
/// └── /api/
///     ├── /auth/                     # Login, registration, current user
///     │   ├── POST /login
///     │   ├── POST /register
///     │   └── GET  /me?username=
///     ├── /users/                    # User administration
///     ├── /products/                 # Inventory catalogue + low-stock views
///     ├── /suppliers/                # Supplier directory
///     ├── /tasks/                    # Task lifecycle + per-user views
///     └── /dashboard/stats           # Aggregate counts
/// ```
///
/// No authentication middleware: actor identity rides on `?username=` query
/// parameters and the policy lives in the service layer.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/login", axum::routing::post(routes::auth::login))
        .route("/register", axum::routing::post(routes::auth::register))
        .route("/me", get(routes::auth::current_user));

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::get_all_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            axum::routing::put(routes::users::update_user).delete(routes::users::delete_user),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(routes::products::get_all_products).post(routes::products::create_product),
        )
        .route("/low-stock", get(routes::products::get_low_stock_products))
        .route("/search", get(routes::products::search_products))
        .route(
            "/category/:category",
            get(routes::products::get_products_by_category),
        )
        .route(
            "/:id",
            get(routes::products::get_product_by_id)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        );

    let supplier_routes = Router::new()
        .route(
            "/",
            get(routes::suppliers::get_all_suppliers).post(routes::suppliers::create_supplier),
        )
        .route("/search", get(routes::suppliers::search_suppliers))
        .route(
            "/:id",
            get(routes::suppliers::get_supplier_by_id)
                .put(routes::suppliers::update_supplier)
                .delete(routes::suppliers::delete_supplier),
        );

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::get_all_tasks).post(routes::tasks::create_task),
        )
        .route("/staff", get(routes::tasks::get_staff_members))
        .route(
            "/assigned/:username",
            get(routes::tasks::get_tasks_by_assigned_user),
        )
        .route(
            "/created/:username",
            get(routes::tasks::get_tasks_by_created_user),
        )
        .route("/overdue/:username", get(routes::tasks::get_overdue_tasks))
        .route("/stats/:username", get(routes::tasks::get_task_stats))
        .route(
            "/:id",
            get(routes::tasks::get_task_by_id)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let dashboard_routes =
        Router::new().route("/stats", get(routes::dashboard::get_dashboard_stats));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/products", product_routes)
        .nest("/suppliers", supplier_routes)
        .nest("/tasks", task_routes)
        .nest("/dashboard", dashboard_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
