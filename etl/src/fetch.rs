use async_trait::async_trait;
use common::Result;
use futures::StreamExt;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Streams a single remote file to local storage.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Download `url` to `local_path`, returning the number of bytes written.
    async fn download(&self, url: &str, local_path: &Path) -> Result<u64>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FileFetcher for HttpFetcher {
    async fn download(&self, url: &str, local_path: &Path) -> Result<u64> {
        debug!(url, local_path = %local_path.display(), "Downloading file");

        let response = self.client.get(url).send().await?.error_for_status()?;

        // Write chunk by chunk; source files can be large.
        let mut file = File::create(local_path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url, file_size = written, "File downloaded");
        Ok(written)
    }
}
