use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{CreateUser, NewUser, User};

/// Credential store: lookup by email and insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<CreateUser>;
}

#[async_trait]
impl UserStore for PgPool {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<CreateUser> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self)
        .await;

        match res {
            Ok(created) => Ok(CreateUser::Created(created)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(CreateUser::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }
}
