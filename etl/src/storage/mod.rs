pub mod s3;

pub use s3::S3Storage;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use common::Result;
use common::config::Settings;
use std::path::Path;

/// Uploads named objects into a bucket-like store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create or overwrite the object at `key` from a local file.
    async fn put_file(&self, local_path: &Path, key: &str) -> Result<()>;
    /// Does an object with the specified key exist in the bucket?
    async fn exists(&self, key: &str) -> Result<bool>;
    fn bucket(&self) -> &str;
}

/// Build an S3 client.
///
/// Inside AWS the client uses the credentials of the running service
/// instance (e.g. the ECS task role). Outside AWS, explicit credentials from
/// the settings take precedence over the default provider chain.
pub async fn build_client(settings: &Settings) -> Result<S3Client> {
    if common::env::is_running_in_aws() || settings.aws_access_key_id.is_empty() {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        return Ok(S3Client::new(&config));
    }

    let session_token = if settings.aws_session_token.is_empty() {
        None
    } else {
        Some(settings.aws_session_token.clone())
    };
    let credentials = Credentials::new(
        &settings.aws_access_key_id,
        &settings.aws_secret_access_key,
        session_token,
        None,
        "static",
    );

    let mut builder = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(settings.s3_region.clone()))
        .credentials_provider(credentials);
    if !settings.s3_endpoint.is_empty() {
        builder = builder
            .endpoint_url(&settings.s3_endpoint)
            .force_path_style(true);
    }

    Ok(S3Client::from_conf(builder.build()))
}
