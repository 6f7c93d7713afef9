use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored journal entry, serialized for the client in camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub mood_score: f64,
    pub ai_advice: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub mood_score: f64,
    pub ai_advice: String,
    pub created_at: OffsetDateTime,
}
