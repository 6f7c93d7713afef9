use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::AppConfig;

const REGION: &str = "us-east-1";

/// Object store holding the images attached to journal entries.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Writes `body` under `key`, replacing any previous object.
    async fn put_image(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    /// Time-limited GET URL for `key`.
    async fn presign_image(&self, key: &str, ttl: Duration) -> anyhow::Result<String>;
}

/// S3-compatible (MinIO) backend.
#[derive(Clone)]
pub struct S3ImageStore {
    client: Client,
    bucket: String,
}

impl S3ImageStore {
    pub async fn connect(cfg: &AppConfig) -> Self {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(REGION))
            .credentials_provider(Credentials::new(
                &cfg.minio_access_key,
                &cfg.minio_secret_key,
                None,
                None,
                "mood-journal-env",
            ))
            .load()
            .await;

        // MinIO only speaks path-style addressing.
        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.minio_endpoint)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(conf),
            bucket: cfg.minio_bucket.clone(),
        }
    }

    /// Creates the image bucket on first start.
    pub async fn ensure_bucket(&self) -> anyhow::Result<()> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("create bucket {}", self.bucket))?;
        info!(bucket = %self.bucket, "image bucket created");
        Ok(())
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn put_image(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("upload image {key}"))?;
        Ok(())
    }

    async fn presign_image(&self, key: &str, ttl: Duration) -> anyhow::Result<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(ttl)?)
            .await
            .with_context(|| format!("presign image {key}"))?;
        Ok(request.uri().to_string())
    }
}
