/// Database models for Stockroom
///
/// This module contains all database models and their typed queries. Each
/// model exposes async methods on `&PgPool`; every method is a single logical
/// statement and no cross-call atomicity is provided.
///
/// # Models
///
/// - `user`: User accounts and roles
/// - `task`: Tasks with creator/assignee ownership and due dates
/// - `product`: Product catalogue with stock levels
/// - `supplier`: Supplier directory
///
/// # Example
///
/// ```no_run
/// use stockroom_shared::models::user::{CreateUser, Role, User};
/// use stockroom_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "manager1".to_string(),
///     email: "manager@example.com".to_string(),
///     password: "password123".to_string(),
///     role: Role::Manager,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod product;
pub mod supplier;
pub mod task;
pub mod user;
