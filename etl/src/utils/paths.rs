use common::{Error, Result};
use std::path::{Path, PathBuf};

/// Local raw/processed paths for one manifest entry. The filename is the
/// single key tying every derived path together.
#[derive(Debug, Clone)]
pub struct FilePaths {
    pub raw: PathBuf,
    pub processed: PathBuf,
}

impl FilePaths {
    pub fn new(working_directory: &Path, filename: &str) -> Self {
        Self {
            raw: working_directory.join("raw").join(filename),
            processed: working_directory.join("processed").join(filename),
        }
    }
}

/// Join a root URL and a filename, normalizing the root to end with '/'.
pub fn build_file_url(root_url: &str, filename: &str) -> String {
    let mut url = root_url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(filename);
    url
}

pub fn raw_object_key(filename: &str) -> String {
    format!("raw/{filename}")
}

pub fn processed_object_key(filename: &str) -> String {
    format!("processed/{filename}")
}

/// Extract the year from a `<EnergyType><Year>.csv.gz` filename
/// (case-insensitive on the type token).
pub fn extract_year(filename: &str) -> Result<i32> {
    let stem = filename.to_lowercase();
    let stem = stem.strip_suffix(".gz").unwrap_or(&stem);
    let stem = match stem.rfind('.') {
        Some(index) => &stem[..index],
        None => stem,
    };
    let remainder = stem.replace("gas", "").replace("electricity", "");
    remainder.parse::<i32>().map_err(|_| {
        Error::Configuration(format!(
            "Cannot extract a year from the filename '{filename}'."
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("Gas2020.csv.gz").unwrap(), 2020);
        assert_eq!(extract_year("Electricity1999.csv.gz").unwrap(), 1999);
    }

    #[test]
    fn test_extract_year_is_case_insensitive() {
        assert_eq!(extract_year("gas2020.CSV.GZ").unwrap(), 2020);
        assert_eq!(extract_year("ELECTRICITY2021.Csv.Gz").unwrap(), 2021);
    }

    #[test]
    fn test_extract_year_rejects_nonconforming_names() {
        assert!(extract_year("Badname.csv.gz").unwrap_err().is_configuration());
        assert!(extract_year("Gas.csv.gz").is_err());
        assert!(extract_year("").is_err());
    }

    #[test]
    fn test_build_file_url() {
        assert_eq!(
            build_file_url("http://x.test/energy", "Gas2020.csv.gz"),
            "http://x.test/energy/Gas2020.csv.gz"
        );
    }

    #[test]
    fn test_build_file_url_trailing_slash_is_idempotent() {
        assert_eq!(
            build_file_url("http://x.test/energy/", "Gas2020.csv.gz"),
            build_file_url("http://x.test/energy", "Gas2020.csv.gz")
        );
    }

    #[test]
    fn test_object_keys() {
        assert_eq!(raw_object_key("Gas2020.csv.gz"), "raw/Gas2020.csv.gz");
        assert_eq!(
            processed_object_key("Gas2020.csv.gz"),
            "processed/Gas2020.csv.gz"
        );
    }

    #[test]
    fn test_file_paths_share_the_filename() {
        let paths = FilePaths::new(Path::new("data"), "Gas2020.csv.gz");
        assert_eq!(paths.raw, Path::new("data/raw/Gas2020.csv.gz"));
        assert_eq!(paths.processed, Path::new("data/processed/Gas2020.csv.gz"));
    }
}
