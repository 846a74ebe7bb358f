use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use common::Result;
use common::config::Settings;
use std::path::Path;

use crate::storage::ObjectStorage;

pub struct S3Storage {
    bucket: String,
    client: S3Client,
}

impl S3Storage {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let client = crate::storage::build_client(settings).await?;

        Ok(Self {
            bucket: settings.aws_s3_bucket_name.clone(),
            client,
        })
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_file(&self, local_path: &Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(local_path).await?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(err) => common::Error::Storage(err.into_err().to_string()),
                _ => common::Error::Storage(e.to_string()),
            })?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => Ok(false),
            Err(e) => Err(common::Error::Storage(e.to_string())),
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
