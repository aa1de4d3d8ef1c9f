use crate::auth::password::SecretHasher;
use crate::auth::policy::SecretCheck;
use crate::error::{AppError, Result};
use crate::model::role::Role;
use crate::model::staff::{NewStaff, StaffChanges, StaffProfile, StaffStatistics};
use crate::store::{StaffStore, StoreError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct StaffRegistration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<Role>,
}

/// CRUD over staff accounts. Profiles returned from here never carry the
/// password digest.
#[derive(Clone)]
pub struct StaffDirectory {
    staff: Arc<dyn StaffStore>,
    hasher: Arc<dyn SecretHasher>,
}

fn email_taken(e: StoreError) -> AppError {
    match e {
        StoreError::Duplicate(_) => AppError::conflict("Email already exists"),
        other => other.into(),
    }
}

impl StaffDirectory {
    pub fn new(staff: Arc<dyn StaffStore>, hasher: Arc<dyn SecretHasher>) -> Self {
        Self { staff, hasher }
    }

    pub async fn create(&self, registration: StaffRegistration) -> Result<StaffProfile> {
        if self.staff.find_staff_by_email(&registration.email).await?.is_some() {
            return Err(AppError::conflict("Email already exists"));
        }

        let password_hash = self.hasher.hash(&registration.password)?;
        let account = self
            .staff
            .insert_staff(NewStaff {
                email: registration.email,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                role: registration.role.unwrap_or_default(),
            })
            .await
            .map_err(email_taken)?;

        info!(staff_id = %account.id, role = %account.role, "Staff member created");
        Ok(account.profile())
    }

    pub async fn list(&self) -> Result<Vec<StaffProfile>> {
        let accounts = self.staff.list_staff().await?;
        Ok(accounts.iter().map(|a| a.profile()).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<StaffProfile> {
        self.staff
            .find_staff(id)
            .await?
            .map(|a| a.profile())
            .ok_or_else(|| AppError::not_found("Staff member not found"))
    }

    pub async fn update(&self, id: Uuid, changes: StaffChanges) -> Result<StaffProfile> {
        let existing = self
            .staff
            .find_staff(id)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))?;

        if let Some(email) = changes.email.as_deref() {
            if email != existing.email && self.staff.find_staff_by_email(email).await?.is_some() {
                return Err(AppError::conflict("Email already exists"));
            }
        }

        let updated = self
            .staff
            .update_staff(id, changes)
            .await
            .map_err(email_taken)?
            .ok_or_else(|| AppError::not_found("Staff member not found"))?;

        info!(staff_id = %id, "Staff member updated");
        Ok(updated.profile())
    }

    /// `check` comes from the authorization policy: self-service changes
    /// must present the current password, administrative resets do not.
    pub async fn change_password(
        &self,
        id: Uuid,
        current: Option<&str>,
        new_password: &str,
        check: SecretCheck,
    ) -> Result<()> {
        let account = self
            .staff
            .find_staff(id)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))?;

        if check == SecretCheck::CurrentRequired {
            let current = current
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::validation("currentPassword: Current password is required"))?;
            if !self.hasher.verify(current, &account.password_hash) {
                return Err(AppError::validation("Current password is incorrect"));
            }
        }

        let digest = self.hasher.hash(new_password)?;
        if !self.staff.set_password_hash(id, &digest).await? {
            return Err(AppError::not_found("Staff member not found"));
        }

        info!(staff_id = %id, ?check, "Password updated");
        Ok(())
    }

    /// Also removes every attendance row of the account.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.staff.delete_staff(id).await? {
            return Err(AppError::not_found("Staff member not found"));
        }
        info!(staff_id = %id, "Staff member deleted");
        Ok(())
    }

    pub async fn statistics(&self) -> Result<StaffStatistics> {
        let accounts = self.staff.list_staff().await?;
        Ok(StaffStatistics::tally(&accounts))
    }
}
