use crate::model::role::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A staff account as stored, including the password digest. Never
/// serialized; use [`StaffAccount::profile`] for anything leaving the
/// process.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StaffAccount {
    pub fn profile(&self) -> StaffProfile {
        StaffProfile {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "6f1c1f0e-3b2a-4c59-9a55-7c1f5f1f2a10",
    "email": "alice@example.com",
    "firstName": "Alice",
    "lastName": "Moreau",
    "role": "STAFF",
    "createdAt": "2024-01-01T08:00:00Z",
    "updatedAt": "2024-01-01T08:00:00Z"
}))]
pub struct StaffProfile {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewStaff {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct StaffChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

impl StaffChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StaffStatistics {
    #[schema(example = 12)]
    pub total: u64,
    #[schema(example = 2)]
    pub admins: u64,
    #[schema(example = 10)]
    pub staff: u64,
}

impl StaffStatistics {
    pub fn tally<'a>(accounts: impl IntoIterator<Item = &'a StaffAccount>) -> Self {
        accounts
            .into_iter()
            .fold(StaffStatistics::default(), |mut stats, account| {
                stats.total += 1;
                match account.role {
                    Role::Admin => stats.admins += 1,
                    Role::Staff => stats.staff += 1,
                }
                stats
            })
    }
}
