pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod transform;
pub mod utils;

use std::path::Path;
use std::sync::Arc;

use common::Result;
use common::config::Settings;
use tracing::info;

use crate::fetch::HttpFetcher;
use crate::models::{BatchSummary, Manifest};
use crate::pipeline::FileProcessor;
use crate::storage::{ObjectStorage, S3Storage};

/// Download the configured raw data files, create processed files and upload
/// both sets into the S3 bucket.
pub async fn run_file_pipeline(settings: &Settings) -> Result<BatchSummary> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    let storage = Arc::new(S3Storage::new(settings).await?);
    info!(bucket = storage.bucket(), "Uploading into bucket");
    let processor = FileProcessor::new(fetcher, storage, settings);
    run_batch(&processor, settings).await
}

/// Validate the source configuration, prepare the working directories and
/// process every manifest entry in order, continuing past contained
/// per-file failures.
pub async fn run_batch(processor: &FileProcessor, settings: &Settings) -> Result<BatchSummary> {
    let manifest = Manifest::from_settings(settings)?;

    ensure_working_directories(processor.working_directory()).await?;

    let mut summary = BatchSummary::default();
    for entry in &manifest.entries {
        let outcome = processor
            .process_one(entry.energy_type, &entry.root_url, &entry.filename)
            .await?;
        summary.record(outcome);
    }

    info!(
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "File processing finished"
    );
    Ok(summary)
}

async fn ensure_working_directories(working_directory: &Path) -> Result<()> {
    for directory in [
        working_directory.to_path_buf(),
        working_directory.join("raw"),
        working_directory.join("processed"),
    ] {
        tokio::fs::create_dir_all(&directory).await?;
    }
    Ok(())
}
