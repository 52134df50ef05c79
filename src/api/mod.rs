//! HTTP surface: routes, handlers, request/response bodies, and the bearer
//! auth extractors.

mod handlers;
mod models;
mod routes;

pub use routes::api_router;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth;
use crate::error::Error;
use crate::models::Account;
use crate::server::AppState;

/// The verified account behind the request's bearer token.
pub struct CurrentUser(pub Account);

/// Same, with the admin role checked.
pub struct AdminUser(pub Account);

async fn authenticate(parts: &Parts, state: &AppState) -> Result<Account, Error> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("missing bearer token".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Unauthorized("missing bearer token".to_string()))?;

    let claims = auth::verify_token(token, &state.config.jwt_secret)?;

    let account = state
        .db
        .get_account(&claims.sub)
        .await?
        .ok_or_else(|| Error::Unauthorized("account no longer exists".to_string()))?;

    if !account.is_active {
        return Err(Error::Unauthorized("account is deactivated".to_string()));
    }

    Ok(account)
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        Ok(CurrentUser(authenticate(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Error> {
        let account = authenticate(parts, state).await?;
        if !account.is_admin() {
            return Err(Error::Forbidden("admin access required"));
        }
        Ok(AdminUser(account))
    }
}
