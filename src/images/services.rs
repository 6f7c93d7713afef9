use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

pub const UPLOAD_PREFIX: &str = "uploads";
pub const PRESIGN_TTL: Duration = Duration::from_secs(10 * 60);

/// An image attached to an entry submission.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Reduces a client-supplied file name to its final path component.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(&['/', '\\'][..]).next().unwrap_or("").trim();
    match name {
        "" | "." | ".." => None,
        n => Some(n.to_string()),
    }
}

/// Images are namespaced by owner so equal file names never collide.
pub fn object_key(owner: Uuid, file_name: &str) -> String {
    format!("{UPLOAD_PREFIX}/{owner}/{file_name}")
}

/// Public URL of an uploaded image, derived from owner and file name alone.
pub fn image_url(owner: Uuid, file_name: &str) -> String {
    format!("/{}", object_key(owner, file_name))
}

/// Replaces the client file name with its sanitized form, or rejects it.
pub fn validate_upload(img: UploadItem) -> AppResult<UploadItem> {
    match sanitize_file_name(&img.file_name) {
        Some(file_name) => Ok(UploadItem { file_name, ..img }),
        None => Err(AppError::Validation("Invalid image file name".into())),
    }
}

/// Writes the image to object storage and returns its URL.
pub async fn store_image(st: &AppState, owner: Uuid, img: UploadItem) -> anyhow::Result<String> {
    let name = sanitize_file_name(&img.file_name)
        .with_context(|| format!("unusable file name {:?}", img.file_name))?;
    let key = object_key(owner, &name);
    st.images
        .put_image(&key, img.body, &img.content_type)
        .await?;
    Ok(image_url(owner, &name))
}

pub async fn presign_upload(st: &AppState, owner: Uuid, file_name: &str) -> AppResult<String> {
    let name = sanitize_file_name(file_name)
        .ok_or_else(|| AppError::Validation("Invalid image file name".into()))?;
    let key = object_key(owner, &name);
    Ok(st.images.presign_image(&key, PRESIGN_TTL).await?)
}
