use common::config::Settings;
use common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two groups of source files the batch processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Gas,
    Electricity,
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyType::Gas => write!(f, "gas"),
            EnergyType::Electricity => write!(f, "electricity"),
        }
    }
}

/// One row of a raw source file, exactly as published.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "POSTCODE")]
    pub postcode: String,
    #[serde(rename = "Number of meters")]
    pub meter_count: String,
    #[serde(rename = "Consumption (kWh)")]
    pub total_consumption: String,
    #[serde(rename = "Mean consumption (kWh)")]
    pub mean_consumption: String,
    #[serde(rename = "Median consumption (kWh)")]
    pub median_consumption: String,
}

/// One row of a processed file. EnergyType and Year are injected per file;
/// the remaining fields pass through from the raw row unmodified.
#[derive(Debug, Serialize)]
pub struct ProcessedRecord {
    #[serde(rename = "EnergyType")]
    pub energy_type: EnergyType,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "PostCode")]
    pub postcode: String,
    #[serde(rename = "MeterCount")]
    pub meter_count: String,
    #[serde(rename = "TotalConsumption")]
    pub total_consumption: String,
    #[serde(rename = "MeanConsumption")]
    pub mean_consumption: String,
    #[serde(rename = "MedianConsumption")]
    pub median_consumption: String,
}

impl ProcessedRecord {
    pub fn from_raw(energy_type: EnergyType, year: i32, raw: RawRecord) -> Self {
        Self {
            energy_type,
            year,
            postcode: raw.postcode,
            meter_count: raw.meter_count,
            total_consumption: raw.total_consumption,
            mean_consumption: raw.mean_consumption,
            median_consumption: raw.median_consumption,
        }
    }
}

/// One (energy type, filename) pair drawn from the configured manifests.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub energy_type: EnergyType,
    pub root_url: String,
    pub filename: String,
}

/// The full set of files a batch run must process, gas group first,
/// in configuration order.
#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build the manifest from settings, validating the source configuration
    /// before any file is touched.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.data_source_gas_root_url.is_empty() {
            return Err(Error::Configuration(
                "The DATA_SOURCE_GAS_ROOT_URL setting must be specified.".to_string(),
            ));
        }
        if settings.data_source_gas_filenames.is_empty() {
            return Err(Error::Configuration(
                "The DATA_SOURCE_GAS_FILENAMES setting must be specified.".to_string(),
            ));
        }
        if settings.data_source_electricity_root_url.is_empty() {
            return Err(Error::Configuration(
                "The DATA_SOURCE_ELECTRICITY_ROOT_URL setting must be specified.".to_string(),
            ));
        }
        if settings.data_source_electricity_filenames.is_empty() {
            return Err(Error::Configuration(
                "The DATA_SOURCE_ELECTRICITY_FILENAMES setting must be specified.".to_string(),
            ));
        }

        let mut entries = Vec::new();
        for filename in settings.data_source_gas_filenames.split('|') {
            entries.push(ManifestEntry {
                energy_type: EnergyType::Gas,
                root_url: settings.data_source_gas_root_url.clone(),
                filename: filename.to_string(),
            });
        }
        for filename in settings.data_source_electricity_filenames.split('|') {
            entries.push(ManifestEntry {
                energy_type: EnergyType::Electricity,
                root_url: settings.data_source_electricity_root_url.clone(),
                filename: filename.to_string(),
            });
        }

        Ok(Self { entries })
    }
}

/// Sizes and row counts recorded for a successfully processed file.
#[derive(Debug, Clone)]
pub struct FileStats {
    pub raw_bytes: u64,
    pub processed_bytes: u64,
    pub rows: u64,
}

/// The per-entry result the coordinator hands back to the batch driver.
/// A contained step failure lives inside `result`; it never aborts the run.
#[derive(Debug)]
pub struct FileOutcome {
    pub energy_type: EnergyType,
    pub filename: String,
    pub year: i32,
    pub result: Result<FileStats>,
}

/// Aggregated outcomes for one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}
