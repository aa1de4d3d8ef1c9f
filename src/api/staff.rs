use crate::auth::auth::AuthUser;
use crate::auth::policy::{self, Action};
use crate::error::AppError;
use crate::model::role::Role;
use crate::model::staff::{StaffChanges, StaffProfile, StaffStatistics};
use crate::response;
use crate::service::StaffDirectory;
use crate::service::directory::StaffRegistration;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaff {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "pw12345678")]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "Alice")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    #[schema(example = "Moreau")]
    pub last_name: String,
    pub role: Option<Role>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaff {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePassword {
    /// Required when changing your own password as STAFF
    pub current_password: Option<String>,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// Create staff member
#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff member created successfully", body = StaffProfile),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already exists", body = Object, example = json!({
            "success": false,
            "message": "Email already exists",
            "error": "CONFLICT"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn create_staff(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
    payload: web::Json<CreateStaff>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    policy::authorize(&auth, Action::ManageStaff)?;
    let payload = payload.into_inner();

    let profile = directory
        .create(StaffRegistration {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role: payload.role,
        })
        .await?;
    Ok(response::created(profile, "Staff member created successfully"))
}

/// List staff members, newest first
#[utoipa::path(
    get,
    path = "/api/staff",
    responses(
        (status = 200, description = "All staff", body = [StaffProfile]),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn list_staff(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageStaff)?;
    Ok(response::ok(directory.list().await?))
}

/// Staff head-count by role
#[utoipa::path(
    get,
    path = "/api/staff/statistics",
    responses(
        (status = 200, description = "Counts by role", body = StaffStatistics),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn staff_statistics(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ViewStaffStatistics)?;
    Ok(response::ok(directory.statistics().await?))
}

/// Get staff member by ID
#[utoipa::path(
    get,
    path = "/api/staff/{staff_id}",
    params(("staff_id", Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member", body = StaffProfile),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn get_staff(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageStaff)?;
    Ok(response::ok(directory.get(path.into_inner()).await?))
}

/// Update staff member
#[utoipa::path(
    put,
    path = "/api/staff/{staff_id}",
    params(("staff_id", Path, description = "Staff ID")),
    request_body = UpdateStaff,
    responses(
        (status = 200, description = "Staff member updated successfully", body = StaffProfile),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Staff member not found"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_staff(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateStaff>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    policy::authorize(&auth, Action::ManageStaff)?;
    let payload = payload.into_inner();

    let changes = StaffChanges {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
    };
    if changes.is_empty() {
        return Err(AppError::validation("No fields provided for update"));
    }

    let profile = directory.update(path.into_inner(), changes).await?;
    Ok(response::ok_with_message(profile, "Staff member updated successfully"))
}

/// Change password (admin for anyone, staff for themselves)
#[utoipa::path(
    put,
    path = "/api/staff/{staff_id}/password",
    params(("staff_id", Path, description = "Staff ID")),
    request_body = UpdatePassword,
    responses(
        (status = 200, description = "Password updated successfully"),
        (status = 400, description = "Validation error or wrong current password"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn update_password(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdatePassword>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let target = path.into_inner();
    let check = policy::password_change(&auth, target)?;

    directory
        .change_password(
            target,
            payload.current_password.as_deref(),
            &payload.new_password,
            check,
        )
        .await?;
    Ok(response::message("Password updated successfully"))
}

/// Delete staff member and their attendance
#[utoipa::path(
    delete,
    path = "/api/staff/{staff_id}",
    params(("staff_id", Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member deleted successfully"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Staff member not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
pub async fn delete_staff(
    auth: AuthUser,
    directory: web::Data<StaffDirectory>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(&auth, Action::ManageStaff)?;
    directory.delete(path.into_inner()).await?;
    Ok(response::message("Staff member deleted successfully"))
}
