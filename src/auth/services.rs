use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    claims::Claims,
    dto::PublicUser,
    jwt::JwtKeys,
    password::{check_policy, hash_password, verify_account},
    repo_types::{CreateUser, NewUser},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A freshly authenticated user and the token to hand back in the cookie.
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

pub async fn register(
    st: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> AppResult<Session> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    check_policy(password).map_err(|msg| AppError::Validation(msg.into()))?;

    if st.users.find_by_email(email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
    let created = st
        .users
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;
    let user = match created {
        CreateUser::Created(u) => PublicUser::from(u),
        CreateUser::EmailTaken => {
            warn!(email = %email, "email taken by concurrent registration");
            return Err(AppError::DuplicateEmail);
        }
    };

    let token = issue(st, &user)?;
    info!(user_id = %user.id, "user registered");
    Ok(Session { user, token })
}

pub async fn login(st: &AppState, email: &str, password: &str) -> AppResult<Session> {
    let email = email.trim();

    let found = st.users.find_by_email(email).await?;
    let ok = verify_account(password, found.as_ref().map(|u| u.password_hash.as_str()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let user = match found {
        Some(user) if ok => PublicUser::from(user),
        Some(user) => {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!("login with unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };
    let token = issue(st, &user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Session { user, token })
}

/// `Unauthorized` when no token was presented, `InvalidOrExpiredToken` when
/// it fails verification.
pub fn verify_session(keys: &JwtKeys, token: Option<&str>) -> AppResult<Claims> {
    let token = token.ok_or(AppError::Unauthorized)?;
    keys.verify(token).map_err(|e| {
        warn!(error = %e, "session token rejected");
        AppError::InvalidOrExpiredToken
    })
}

fn issue(st: &AppState, user: &PublicUser) -> AppResult<String> {
    JwtKeys::from_ref(st)
        .sign(user)
        .map_err(|e| AppError::Internal(e.to_string()))
}
