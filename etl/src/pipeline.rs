use common::Result;
use common::config::Settings;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::fetch::FileFetcher;
use crate::models::{EnergyType, FileOutcome, FileStats};
use crate::storage::ObjectStorage;
use crate::transform;
use crate::utils::paths::{self, FilePaths};

/// Processes one manifest entry end to end: download, transform, upload raw,
/// upload processed, optional local cleanup.
pub struct FileProcessor {
    fetcher: Arc<dyn FileFetcher>,
    storage: Arc<dyn ObjectStorage>,
    working_directory: PathBuf,
    delete_data_files: bool,
}

impl FileProcessor {
    pub fn new(
        fetcher: Arc<dyn FileFetcher>,
        storage: Arc<dyn ObjectStorage>,
        settings: &Settings,
    ) -> Self {
        Self {
            fetcher,
            storage,
            working_directory: PathBuf::from(&settings.working_directory),
            delete_data_files: settings.cleanup_enabled(),
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Process a single manifest entry.
    ///
    /// A year that cannot be parsed from the filename is a manifest defect
    /// and propagates, aborting the batch. Download, transform and upload
    /// failures are contained in the returned outcome so the batch driver
    /// can continue with the next entry. Artifacts uploaded before a failure
    /// are left in place.
    pub async fn process_one(
        &self,
        energy_type: EnergyType,
        root_url: &str,
        filename: &str,
    ) -> Result<FileOutcome> {
        let url = paths::build_file_url(root_url, filename);
        let file_paths = FilePaths::new(&self.working_directory, filename);
        let year = paths::extract_year(filename)?;

        info!(
            %energy_type,
            year,
            url = %url,
            raw_path = %file_paths.raw.display(),
            processed_path = %file_paths.processed.display(),
            "Processing file"
        );

        let result = self
            .run_steps(energy_type, year, &url, filename, &file_paths)
            .await;

        // Local copies are transient either way; the uploads are the output.
        if self.delete_data_files {
            cleanup_file(&file_paths.raw).await;
            cleanup_file(&file_paths.processed).await;
        }

        match &result {
            Ok(stats) => info!(
                %energy_type,
                year,
                url = %url,
                raw_file_size = stats.raw_bytes,
                processed_file_size = stats.processed_bytes,
                row_count = stats.rows,
                "Processed file"
            ),
            Err(e) => error!(
                %energy_type,
                year,
                url = %url,
                raw_path = %file_paths.raw.display(),
                processed_path = %file_paths.processed.display(),
                error = %e,
                "Error processing file"
            ),
        }

        Ok(FileOutcome {
            energy_type,
            filename: filename.to_string(),
            year,
            result,
        })
    }

    async fn run_steps(
        &self,
        energy_type: EnergyType,
        year: i32,
        url: &str,
        filename: &str,
        file_paths: &FilePaths,
    ) -> Result<FileStats> {
        let raw_bytes = self.fetcher.download(url, &file_paths.raw).await?;
        let rows =
            transform::transform_file(energy_type, year, &file_paths.raw, &file_paths.processed)?;
        let processed_bytes = fs::metadata(&file_paths.processed).await?.len();
        self.storage
            .put_file(&file_paths.raw, &paths::raw_object_key(filename))
            .await?;
        self.storage
            .put_file(&file_paths.processed, &paths::processed_object_key(filename))
            .await?;
        Ok(FileStats {
            raw_bytes,
            processed_bytes,
            rows,
        })
    }
}

async fn cleanup_file(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Deleted file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Error deleting file"),
    }
}
