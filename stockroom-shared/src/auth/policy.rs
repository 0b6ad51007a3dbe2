/// Authorization policy for task operations
///
/// Pure predicates over (actor role, actor identity, task ownership). No I/O
/// happens here; both users are already resolved when a predicate runs, so a
/// missing user has already failed with `NotFound` before any `Forbidden`
/// can be produced.
///
/// # Decision table
///
/// | Operation  | Permitted iff                                              |
/// |------------|------------------------------------------------------------|
/// | create     | creator is MANAGER or ADMIN, and assignee is STAFF         |
/// | update     | actor is the assignee, the creator, or an ADMIN            |
/// | delete     | actor is the creator or an ADMIN                           |
///
/// Reads, lists, and statistics are unrestricted at this layer.

use crate::error::{ServiceError, ServiceResult};
use crate::models::task::Task;
use crate::models::user::{Role, User};

/// Checks that a creator/assignee pair may form a new task
///
/// The creator's role is checked first, so a staff creator is reported even
/// when the assignee is also unsuitable.
pub fn require_create_permission(creator: &User, assignee: &User) -> ServiceResult<()> {
    if creator.role != Role::Manager && creator.role != Role::Admin {
        return Err(ServiceError::Forbidden(
            "Only managers and admins can create tasks".to_string(),
        ));
    }

    if assignee.role != Role::Staff {
        return Err(ServiceError::Forbidden(
            "Tasks can only be assigned to staff members".to_string(),
        ));
    }

    Ok(())
}

/// Checks that an actor may update a task
pub fn require_update_permission(actor: &User, task: &Task) -> ServiceResult<()> {
    if task.assigned_to.username != actor.username
        && task.created_by.username != actor.username
        && actor.role != Role::Admin
    {
        return Err(ServiceError::Forbidden(
            "You don't have permission to update this task".to_string(),
        ));
    }

    Ok(())
}

/// Checks that an actor may delete a task
pub fn require_delete_permission(actor: &User, task: &Task) -> ServiceResult<()> {
    if task.created_by.username != actor.username && actor.role != Role::Admin {
        return Err(ServiceError::Forbidden(
            "You don't have permission to delete this task".to_string(),
        ));
    }

    Ok(())
}
