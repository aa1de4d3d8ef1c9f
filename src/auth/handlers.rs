use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::staff::StaffProfile,
    response,
    service::{CredentialService, credentials::LoginResponse},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "pw12345678")]
    pub password: String,
}

/// Login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "success": false,
            "message": "Invalid credentials",
            "error": "UNAUTHORIZED"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(credentials, body))]
pub async fn login(
    credentials: web::Data<CredentialService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    debug!("Login request received");
    body.validate()?;

    let result = credentials.login(&body.email, &body.password).await?;
    Ok(response::ok_with_message(result, "Login successful"))
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Profile of the caller", body = StaffProfile),
        (status = 401, description = "Missing, invalid or expired token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    auth: AuthUser,
    credentials: web::Data<CredentialService>,
) -> Result<HttpResponse, AppError> {
    let profile = credentials.profile(&auth).await?;
    Ok(response::ok(profile))
}
