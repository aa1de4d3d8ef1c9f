//! Role and ownership rules. Everything here is a pure function of the
//! caller's role, the caller's id and the target of the action.

use crate::{auth::auth::AuthUser, error::AppError, model::role::Role};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Self-service check-in/check-out/today for `staff_id`.
    RecordAttendance { staff_id: Uuid },
    /// Read one attendance record owned by `owner`.
    ViewAttendance { owner: Uuid },
    /// List or aggregate attendance. Always allowed; see [`scoped_staff_filter`].
    QueryAttendance,
    /// Manual create/update/delete of attendance rows.
    ManageAttendance,
    /// Create, list, read, update or delete staff accounts.
    ManageStaff,
    ViewStaffStatistics,
    ViewProfile { staff_id: Uuid },
    ChangePassword { staff_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn decide(role: Role, actor: Uuid, action: Action) -> Decision {
    if role.is_admin() {
        return Decision::Allow;
    }

    let allowed = match action {
        Action::RecordAttendance { staff_id } => staff_id == actor,
        Action::ViewAttendance { owner } => owner == actor,
        Action::QueryAttendance => true,
        Action::ViewProfile { staff_id } => staff_id == actor,
        Action::ChangePassword { staff_id } => staff_id == actor,
        Action::ManageAttendance | Action::ManageStaff | Action::ViewStaffStatistics => false,
    };

    if allowed { Decision::Allow } else { Decision::Deny }
}

pub fn authorize(user: &AuthUser, action: Action) -> Result<(), AppError> {
    match decide(user.role, user.staff_id, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::info!(staff_id = %user.staff_id, ?action, "Access denied");
            Err(AppError::forbidden("Insufficient permissions"))
        }
    }
}

/// Staff id filter to apply to list/statistics queries. STAFF callers are
/// silently narrowed to themselves whatever they asked for.
pub fn scoped_staff_filter(user: &AuthUser, requested: Option<Uuid>) -> Option<Uuid> {
    match user.role {
        Role::Admin => requested,
        Role::Staff => Some(user.staff_id),
    }
}

/// How a password change for `target` must be proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheck {
    /// The caller must present the account's current password.
    CurrentRequired,
    /// Administrative reset; no current password needed.
    Override,
}

pub fn password_change(user: &AuthUser, target: Uuid) -> Result<SecretCheck, AppError> {
    authorize(user, Action::ChangePassword { staff_id: target })?;
    Ok(if user.is_admin() {
        SecretCheck::Override
    } else {
        SecretCheck::CurrentRequired
    })
}
