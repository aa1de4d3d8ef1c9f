use crate::auth::auth::{AuthUser, bearer_token};
use crate::auth::jwt::TokenService;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Verifies the bearer token before any protected handler runs and stores
/// the resulting [`AuthUser`] in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let verified = match req.app_data::<Data<TokenService>>() {
        Some(tokens) => bearer_token(req.request()).and_then(|token| tokens.verify(token)),
        None => Err(AppError::Internal("TokenService missing".into())),
    };

    match verified {
        Ok(user) => {
            req.extensions_mut().insert::<AuthUser>(user);
            next.call(req).await
        }
        Err(e) => {
            let resp = e.error_response();
            Ok(req.into_response(resp))
        }
    }
}
