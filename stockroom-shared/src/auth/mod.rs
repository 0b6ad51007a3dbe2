/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`identity`]: Resolves a username string to a [`crate::models::user::User`] row
/// - [`policy`]: Pure role/ownership predicates gating task operations
/// - [`token`]: The opaque mock session token
///
/// The policy layer is deliberately free of I/O: callers resolve the users
/// first (a missing user always outranks a forbidden role) and then apply
/// the predicates to plain values.
///
/// # Example
///
/// ```no_run
/// use stockroom_shared::auth::{identity, policy};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let creator = identity::resolve_or(&pool, "manager1", "Creator user not found").await?;
/// let assignee = identity::resolve_or(&pool, "staff1", "Assigned user not found").await?;
/// policy::require_create_permission(&creator, &assignee)?;
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod policy;
pub mod token;
