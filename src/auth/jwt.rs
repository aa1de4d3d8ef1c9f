use crate::{auth::auth::AuthUser, error::AppError, model::role::Role};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Staff id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and verifies HS256 bearer tokens. The secret always comes from
/// configuration.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn issue(&self, staff_id: Uuid, email: &str, role: Role) -> Result<String, AppError> {
        self.issue_at(staff_id, email, role, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(
        &self,
        staff_id: Uuid,
        email: &str,
        role: Role,
        issued_at: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: staff_id.to_string(),
            email: email.to_string(),
            role,
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl_secs),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    /// Expired, malformed and badly signed tokens are all `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::unauthorized("Invalid or expired token")
        })?;

        let staff_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            staff_id,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}
