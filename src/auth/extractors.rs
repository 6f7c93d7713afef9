use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;
use uuid::Uuid;

use super::{claims::Claims, cookie::session_token, jwt::JwtKeys, services::verify_session};
use crate::{error::AppError, state::AppState};

/// Validates the session cookie and yields its claims.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let keys = JwtKeys::from_ref(state);
        let claims = verify_session(&keys, session_token(&jar, &state.config.cookie))?;
        Ok(AuthUser(claims))
    }
}

/// Refuses access to a user id other than the session's own.
pub fn ensure_self(session_user: &Uuid, requested: &str) -> Result<(), AppError> {
    match requested.parse::<Uuid>() {
        Ok(id) if id == *session_user => Ok(()),
        _ => {
            warn!(%session_user, requested, "cross-user access refused");
            Err(AppError::Forbidden)
        }
    }
}
