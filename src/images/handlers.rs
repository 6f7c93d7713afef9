use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::get,
    Router,
};
use tracing::instrument;

use super::services::presign_upload;
use crate::{
    auth::extractors::{ensure_self, AuthUser},
    error::AppError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads/:owner/:name", get(get_upload))
}

/// 307 to a short-lived presigned URL; only the owner may fetch.
#[instrument(skip(state, claims))]
pub async fn get_upload(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path((owner, name)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    ensure_self(&claims.sub, &owner)?;
    let url = presign_upload(&state, claims.sub, &name).await?;
    Ok(Redirect::temporary(&url))
}
