use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        cookie::{clear_session, session_cookie, session_token},
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        services::{self, Session},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .route("/auth/logout", post(logout))
}

fn with_session(state: &AppState, jar: CookieJar, session: Session) -> (CookieJar, PublicUser) {
    let ttl = JwtKeys::from_ref(state).ttl;
    let jar = jar.add(session_cookie(&state.config.cookie, session.token, ttl));
    (jar, session.user)
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let session =
        services::register(&state, &payload.username, &payload.email, &payload.password).await?;
    let (jar, user) = with_session(&state, jar, session);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let session = services::login(&state, &payload.email, &payload.password).await?;
    let (jar, user) = with_session(&state, jar, session);
    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful",
            user,
        }),
    ))
}

/// A rejected token is also cleared from the client.
#[instrument(skip(state, jar))]
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<PublicUser>, (CookieJar, AppError)> {
    let keys = JwtKeys::from_ref(&state);
    match services::verify_session(&keys, session_token(&jar, &state.config.cookie)) {
        Ok(claims) => Ok(Json(PublicUser::from(claims))),
        Err(e @ AppError::InvalidOrExpiredToken) => {
            Err((clear_session(jar, &state.config.cookie), e))
        }
        Err(e) => Err((jar, e)),
    }
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    info!("session cookie cleared");
    (
        clear_session(jar, &state.config.cookie),
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}
