use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use staff_attendance::auth::jwt::TokenService;
use staff_attendance::auth::password::Argon2Hasher;
use staff_attendance::clock::LocalClock;
use staff_attendance::config::Config;
use staff_attendance::db::init_db;
use staff_attendance::docs::ApiDoc;
use staff_attendance::routes;
use staff_attendance::service::{AttendanceLedger, CredentialService, StaffDirectory};
use staff_attendance::store::MySqlStore;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log plus stdout
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false),
        )
        .with(fmt::layer().with_target(false))
        .init();

    info!(addr = %config.server_addr, prefix = %config.api_prefix, "Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let store = Arc::new(MySqlStore::new(pool));
    let hasher = Arc::new(Argon2Hasher::new());
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires_in);

    let ledger = Data::new(AttendanceLedger::new(
        store.clone(),
        store.clone(),
        Arc::new(LocalClock),
    ));
    let directory = Data::new(StaffDirectory::new(store.clone(), hasher.clone()));
    let credentials = Data::new(CredentialService::new(store, hasher, tokens.clone()));
    let tokens = Data::new(tokens);

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard serves the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(ledger.clone())
            .app_data(directory.clone())
            .app_data(credentials.clone())
            .app_data(tokens.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
