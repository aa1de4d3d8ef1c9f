#![allow(dead_code)]

use actix_web::web::Data;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use uuid::Uuid;

use staff_attendance::auth::jwt::TokenService;
use staff_attendance::auth::password::Argon2Hasher;
use staff_attendance::clock::FixedClock;
use staff_attendance::config::Config;
use staff_attendance::model::role::Role;
use staff_attendance::service::directory::StaffRegistration;
use staff_attendance::service::{AttendanceLedger, CredentialService, StaffDirectory};
use staff_attendance::store::MemoryStore;

pub const PASSWORD: &str = "pw12345678";

/// Services wired to an in-memory store and a clock frozen at
/// 2024-01-10 08:30:00.
pub struct Ctx {
    pub store: MemoryStore,
    pub clock: Arc<FixedClock>,
    pub config: Config,
    pub tokens: Data<TokenService>,
    pub ledger: Data<AttendanceLedger>,
    pub directory: Data<StaffDirectory>,
    pub credentials: Data<CredentialService>,
}

impl Ctx {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("mysql://unused".to_string()),
            "JWT_SECRET" => Some("integration-test-secret-0123456789".to_string()),
            "RATE_LOGIN_PER_MIN" | "RATE_PROTECTED_PER_MIN" => Some("0".to_string()),
            _ => None,
        })
        .expect("test config");

        let store = MemoryStore::new();
        let clock = Arc::new(FixedClock::at(day(10), hms(8, 30, 0)));
        let hasher = Arc::new(Argon2Hasher::with_cost(1024, 1).expect("argon2 params"));
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_in);

        Ctx {
            ledger: Data::new(AttendanceLedger::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                clock.clone(),
            )),
            directory: Data::new(StaffDirectory::new(Arc::new(store.clone()), hasher.clone())),
            credentials: Data::new(CredentialService::new(
                Arc::new(store.clone()),
                hasher,
                tokens.clone(),
            )),
            tokens: Data::new(tokens),
            store,
            clock,
            config,
        }
    }

    /// Creates an account and returns its id with a bearer header value.
    pub async fn add(&self, email: &str, role: Role) -> (Uuid, String) {
        let profile = self
            .directory
            .create(StaffRegistration {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                role: Some(role),
            })
            .await
            .expect("create staff");
        let token = self
            .tokens
            .issue(profile.id, &profile.email, profile.role)
            .expect("issue token");
        (profile.id, format!("Bearer {token}"))
    }
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

pub fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// Builds the full route table around a [`Ctx`].
#[macro_export]
macro_rules! app {
    ($ctx:expr) => {{
        let ctx = &$ctx;
        let config = ctx.config.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(ctx.ledger.clone())
                .app_data(ctx.directory.clone())
                .app_data(ctx.credentials.clone())
                .app_data(ctx.tokens.clone())
                .configure(move |cfg| staff_attendance::routes::configure(cfg, &config)),
        )
        .await
    }};
}
