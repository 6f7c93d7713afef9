use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::TrendQuery,
    repo_types::Entry,
    services::{list_entries, submit_entry, SubmitEntry},
};
use crate::{
    auth::extractors::{ensure_self, AuthUser},
    error::AppError,
    images::services::UploadItem,
    state::AppState,
    trend::{report, TrendReport, Window},
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/entries/user/:user_id", get(list_user_entries))
        .route("/entries/user/:user_id/trend", get(user_trend))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", post(create_entry))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

// --- handlers ---

/// POST /entries (multipart: userId, title, content, image)
#[instrument(skip(state, claims, mp))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let mut input = SubmitEntry::default();
    let mut claimed_user: Option<String> = None;

    while let Some(field) = mp.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("userId") => claimed_user = Some(field.text().await.map_err(bad_form)?),
            Some("title") => input.title = Some(field.text().await.map_err(bad_form)?),
            Some("content") => input.content = Some(field.text().await.map_err(bad_form)?),
            Some("image") => input.image = read_image(field).await?,
            _ => {}
        }
    }

    if let Some(raw) = claimed_user.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        ensure_self(&claims.sub, raw)?;
    }

    let entry = submit_entry(&state, claims.sub, input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /entries/user/:user_id, newest first.
#[instrument(skip(state, claims))]
pub async fn list_user_entries(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Entry>>, AppError> {
    ensure_self(&claims.sub, &user_id)?;
    Ok(Json(list_entries(&state, claims.sub).await?))
}

/// GET /entries/user/:user_id/trend?window=week|month|year|all
#[instrument(skip(state, claims))]
pub async fn user_trend(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
    Query(q): Query<TrendQuery>,
) -> Result<Json<TrendReport>, AppError> {
    ensure_self(&claims.sub, &user_id)?;
    let window = match q.window.as_deref() {
        None | Some("") => Window::default(),
        Some(w) => w.parse::<Window>().map_err(AppError::Validation)?,
    };
    let entries = list_entries(&state, claims.sub).await?;
    Ok(Json(report(&entries, window)))
}

/// Browsers send an empty file part when no image was picked.
async fn read_image(field: Field<'_>) -> Result<Option<UploadItem>, AppError> {
    let file_name = field.file_name().map(str::to_string).unwrap_or_default();
    let content_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| "application/octet-stream".into());
    let body = field.bytes().await.map_err(bad_form)?;
    if file_name.is_empty() || body.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadItem {
        file_name,
        content_type,
        body,
    }))
}

fn bad_form(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::Validation(format!("Invalid form data: {}", e.body_text()))
}
