use crate::auth::{auth::AuthUser, jwt::TokenService, password::SecretHasher};
use crate::error::{AppError, Result};
use crate::model::staff::{StaffAccount, StaffProfile};
use crate::store::StaffStore;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: StaffProfile,
}

/// Verifies email/password pairs and issues bearer tokens.
#[derive(Clone)]
pub struct CredentialService {
    staff: Arc<dyn StaffStore>,
    hasher: Arc<dyn SecretHasher>,
    tokens: TokenService,
}

impl CredentialService {
    pub fn new(staff: Arc<dyn StaffStore>, hasher: Arc<dyn SecretHasher>, tokens: TokenService) -> Self {
        Self {
            staff,
            hasher,
            tokens,
        }
    }

    /// Unknown email and wrong password fail identically.
    pub async fn verify(&self, email: &str, password: &str) -> Result<StaffAccount> {
        let Some(account) = self.staff.find_staff_by_email(email).await? else {
            tracing::info!("Invalid credentials: unknown email");
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        if !self.hasher.verify(password, &account.password_hash) {
            tracing::info!(staff_id = %account.id, "Invalid credentials: password mismatch");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let account = self.verify(email, password).await?;
        let token = self.tokens.issue(account.id, &account.email, account.role)?;

        tracing::info!(staff_id = %account.id, role = %account.role, "Login successful");
        Ok(LoginResponse {
            token,
            user: account.profile(),
        })
    }

    /// The caller's own profile; a token whose account is gone is rejected.
    pub async fn profile(&self, user: &AuthUser) -> Result<StaffProfile> {
        self.staff
            .find_staff(user.staff_id)
            .await?
            .map(|a| a.profile())
            .ok_or_else(|| AppError::unauthorized("User not found"))
    }
}
