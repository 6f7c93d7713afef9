use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Entry, NewEntry};

#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn insert(&self, entry: NewEntry) -> anyhow::Result<Uuid>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Entry>>;
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Entry>>;
}

#[async_trait]
impl EntryStore for PgPool {
    async fn insert(&self, entry: NewEntry) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO journal_entries
                (id, user_id, title, content, image_url, mood_score, ai_advice, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(entry.user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(&entry.image_url)
        .bind(entry.mood_score)
        .bind(&entry.ai_advice)
        .bind(entry.created_at)
        .execute(self)
        .await
        .context("insert journal entry")?;
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Entry>> {
        let row = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, user_id, title, content, image_url, mood_score, ai_advice, created_at
            FROM journal_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await
        .context("find journal entry")?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, user_id, title, content, image_url, mood_score, ai_advice, created_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self)
        .await
        .context("list journal entries")?;
        Ok(rows)
    }
}
