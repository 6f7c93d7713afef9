use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Entry, NewEntry};
use crate::{
    error::{AppError, AppResult},
    images::services::{store_image, validate_upload, UploadItem},
    state::AppState,
};

/// Fields of an entry submission as they arrive from the client.
#[derive(Debug, Default)]
pub struct SubmitEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<UploadItem>,
}

/// Validates, scores, stores the image, then persists the entry.
///
/// Any failure before the insert leaves nothing behind in the entry store.
pub async fn submit_entry(st: &AppState, user_id: Uuid, input: SubmitEntry) -> AppResult<Entry> {
    let content = input
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Content is required".into()))?;
    let title = input.title.filter(|t| !t.trim().is_empty());
    let image = input.image.map(validate_upload).transpose()?;

    let analysis = st
        .scorer
        .analyze(&content, title.as_deref().unwrap_or(""))
        .await
        .map_err(|e| {
            warn!(%user_id, error = %e, "entry not scored");
            AppError::ScoringUnavailable(e)
        })?;

    let image_url = match image {
        Some(img) => Some(store_image(st, user_id, img).await?),
        None => None,
    };

    let id = st
        .entries
        .insert(NewEntry {
            user_id,
            title,
            content,
            image_url,
            mood_score: analysis.mood_score,
            ai_advice: analysis.advice,
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;

    let entry = st
        .entries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("entry {id} missing after insert")))?;
    info!(%user_id, entry_id = %id, mood_score = entry.mood_score, "entry created");
    Ok(entry)
}

pub async fn list_entries(st: &AppState, user_id: Uuid) -> AppResult<Vec<Entry>> {
    Ok(st.entries.list_by_user(user_id).await?)
}
