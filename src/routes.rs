use crate::{
    api::{attendance, staff},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
    response,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpResponse,
    http::StatusCode,
    middleware::{Condition, from_fn},
    web,
};
use serde_json::json;

type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

// Per peer IP; 0 requests per minute switches the limiter off.
fn build_limiter(requests_per_min: u32) -> Condition<Limiter> {
    let per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / per_min as u64).max(1))
        .burst_size(per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("limiter period and burst are non-zero");
    Condition::new(requests_per_min > 0, Governor::new(&cfg))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "OK" }))
}

async fn not_found() -> HttpResponse {
    response::failure(StatusCode::NOT_FOUND, "Route not found", "NOT_FOUND")
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = build_limiter(config.rate_login_per_min);
    let protected_limiter = || build_limiter(config.rate_protected_per_min);

    // Extractor failures answer with the same envelope as handler errors
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::validation(format!("Invalid id: {err}")).into()),
    );

    cfg.service(web::resource("/health").route(web::get().to(health)));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::resource("/auth/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/auth/me")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter())
                    .route(web::get().to(handlers::me)),
            )
            .service(
                web::scope("/staff")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter())
                    // /staff
                    .service(
                        web::resource("")
                            .route(web::post().to(staff::create_staff))
                            .route(web::get().to(staff::list_staff)),
                    )
                    // /staff/statistics, ahead of /staff/{id}
                    .service(
                        web::resource("/statistics").route(web::get().to(staff::staff_statistics)),
                    )
                    // /staff/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(staff::get_staff))
                            .route(web::put().to(staff::update_staff))
                            .route(web::delete().to(staff::delete_staff)),
                    )
                    // /staff/{id}/password
                    .service(
                        web::resource("/{id}/password")
                            .route(web::put().to(staff::update_password)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .wrap(from_fn(auth_middleware))
                    .wrap(protected_limiter())
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    .service(
                        web::resource("/statistics").route(web::get().to(attendance::statistics)),
                    )
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::post().to(attendance::create_attendance))
                            .route(web::get().to(attendance::list_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            ),
    );

    cfg.default_service(web::to(not_found));
}
