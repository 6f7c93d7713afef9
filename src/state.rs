use std::{sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::PgPool;

use crate::auth::repo::UserStore;
use crate::config::AppConfig;
use crate::entries::repo::EntryStore;
use crate::scoring::{HttpScoreProvider, ScoreProvider};
use crate::storage::{ImageStore, S3ImageStore};

/// Long-lived handles shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub entries: Arc<dyn EntryStore>,
    pub images: Arc<dyn ImageStore>,
    pub scorer: Arc<dyn ScoreProvider>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(config);

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let images = S3ImageStore::connect(&config).await;
        images.ensure_bucket().await?;
        let images = Arc::new(images) as Arc<dyn ImageStore>;

        let scorer = Arc::new(
            HttpScoreProvider::new(
                &config.scoring.url,
                Duration::from_secs(config.scoring.timeout_secs),
            )
            .context("build scoring client")?,
        ) as Arc<dyn ScoreProvider>;

        let state = Self::from_parts(
            config,
            Arc::new(db.clone()),
            Arc::new(db.clone()),
            images,
            scorer,
        );
        Ok((state, db))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        entries: Arc<dyn EntryStore>,
        images: Arc<dyn ImageStore>,
        scorer: Arc<dyn ScoreProvider>,
    ) -> Self {
        Self {
            config,
            users,
            entries,
            images,
            scorer,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::test_support::Fakes::new().state
    }
}
