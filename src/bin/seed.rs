//! Creates the initial administrator (and optionally one staff account).
//! Running it again leaves existing accounts untouched.

use anyhow::{Context, bail};
use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tracing::info;

use staff_attendance::auth::password::Argon2Hasher;
use staff_attendance::db::init_db;
use staff_attendance::error::AppError;
use staff_attendance::model::role::Role;
use staff_attendance::service::StaffDirectory;
use staff_attendance::service::directory::StaffRegistration;
use staff_attendance::store::MySqlStore;

async fn ensure(directory: &StaffDirectory, registration: StaffRegistration) -> anyhow::Result<()> {
    let email = registration.email.clone();
    match directory.create(registration).await {
        Ok(profile) => info!(staff_id = %profile.id, %email, role = %profile.role, "Seeded account"),
        Err(AppError::Conflict(_)) => info!(%email, "Account already exists, skipping"),
        Err(e) => return Err(e).with_context(|| format!("Failed to seed {email}")),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let admin_email = env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let admin_password = env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD must be set")?;
    let staff = match (env::var("SEED_STAFF_EMAIL").ok(), env::var("SEED_STAFF_PASSWORD").ok()) {
        (Some(email), Some(password)) => Some((email, password)),
        (None, None) => None,
        _ => bail!("SEED_STAFF_EMAIL and SEED_STAFF_PASSWORD must be set together"),
    };

    let pool = init_db(&database_url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let directory = StaffDirectory::new(Arc::new(MySqlStore::new(pool)), Arc::new(Argon2Hasher::new()));

    ensure(
        &directory,
        StaffRegistration {
            email: admin_email,
            password: admin_password,
            first_name: "System".into(),
            last_name: "Administrator".into(),
            role: Some(Role::Admin),
        },
    )
    .await?;

    if let Some((email, password)) = staff {
        ensure(
            &directory,
            StaffRegistration {
                email,
                password,
                first_name: "Sample".into(),
                last_name: "Staff".into(),
                role: Some(Role::Staff),
            },
        )
        .await?;
    }

    Ok(())
}
