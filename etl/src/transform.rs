use common::{Error, Result};
use csv::{ReaderBuilder, WriterBuilder};
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::models::{EnergyType, ProcessedRecord, RawRecord};

pub const RAW_FIELD_NAMES: [&str; 5] = [
    "POSTCODE",
    "Number of meters",
    "Consumption (kWh)",
    "Mean consumption (kWh)",
    "Median consumption (kWh)",
];

pub const PROCESSED_FIELD_NAMES: [&str; 7] = [
    "EnergyType",
    "Year",
    "PostCode",
    "MeterCount",
    "TotalConsumption",
    "MeanConsumption",
    "MedianConsumption",
];

/// Create a processed data file from the specified raw data file.
///
/// Two new columns are added to the data, EnergyType and Year, and the raw
/// column names are renamed to the normalized output schema. Values pass
/// through as text. Rows are streamed one at a time and written in input
/// order. Returns the number of data rows written.
pub fn transform_file(
    energy_type: EnergyType,
    year: i32,
    raw_path: &Path,
    processed_path: &Path,
) -> Result<u64> {
    debug!(
        raw_path = %raw_path.display(),
        processed_path = %processed_path.display(),
        "Processing file"
    );

    let input = File::open(raw_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(MultiGzDecoder::new(input));

    let headers = reader.headers().map_err(map_csv_error)?.clone();
    let missing: Vec<&str> = RAW_FIELD_NAMES
        .iter()
        .filter(|name| !headers.iter().any(|header| header == **name))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(Error::Schema(format!(
            "Input file {} is missing required columns: {}",
            raw_path.display(),
            missing.join(", ")
        )));
    }

    let output = File::create(processed_path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(GzEncoder::new(output, Compression::default()));

    // Header goes out even when the input has no data rows.
    writer.write_record(PROCESSED_FIELD_NAMES)?;

    let mut rows: u64 = 0;
    for record in reader.deserialize::<RawRecord>() {
        let raw = record.map_err(map_csv_error)?;
        writer.serialize(ProcessedRecord::from_raw(energy_type, year, raw))?;
        rows += 1;
    }

    writer.flush()?;
    let encoder = writer.into_inner().map_err(|e| {
        Error::Other(format!(
            "Error finalising {}: {e}",
            processed_path.display()
        ))
    })?;
    encoder.finish()?;

    debug!(row_count = rows, "File processed");
    Ok(rows)
}

fn map_csv_error(e: csv::Error) -> Error {
    if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) {
        Error::Encoding(e.to_string())
    } else {
        Error::Csv(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_gzip(path: &Path, data: &[u8]) {
        let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap();
    }

    fn read_gzip_csv(path: &Path) -> Vec<Vec<String>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_reader(MultiGzDecoder::new(File::open(path).unwrap()));
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn raw_csv(rows: &[[&str; 5]]) -> Vec<u8> {
        let mut data = RAW_FIELD_NAMES.join(",").into_bytes();
        data.push(b'\n');
        for row in rows {
            data.extend_from_slice(row.join(",").as_bytes());
            data.push(b'\n');
        }
        data
    }

    #[test]
    fn test_transform_maps_columns_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("Gas2020.csv.gz");
        let processed_path = dir.path().join("Gas2020.out.csv.gz");
        write_gzip(
            &raw_path,
            &raw_csv(&[
                ["AB1", "10", "1000", "100.0", "95.5"],
                ["AB2", "20", "2000", "100.5", "96.5"],
                ["AB3", "30", "3000", "101.0", "97.5"],
            ]),
        );

        let rows = transform_file(EnergyType::Gas, 2020, &raw_path, &processed_path).unwrap();
        assert_eq!(rows, 3);

        let output = read_gzip_csv(&processed_path);
        assert_eq!(output.len(), 4);
        assert_eq!(output[0], PROCESSED_FIELD_NAMES.to_vec());
        assert_eq!(
            output[1],
            vec!["gas", "2020", "AB1", "10", "1000", "100.0", "95.5"]
        );
        assert_eq!(
            output[2],
            vec!["gas", "2020", "AB2", "20", "2000", "100.5", "96.5"]
        );
        assert_eq!(
            output[3],
            vec!["gas", "2020", "AB3", "30", "3000", "101.0", "97.5"]
        );
    }

    #[test]
    fn test_transform_injects_electricity_constants() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("Electricity1999.csv.gz");
        let processed_path = dir.path().join("out.csv.gz");
        write_gzip(&raw_path, &raw_csv(&[["ZZ9", "5", "500", "100", "99"]]));

        transform_file(EnergyType::Electricity, 1999, &raw_path, &processed_path).unwrap();

        let output = read_gzip_csv(&processed_path);
        assert_eq!(output[1][0], "electricity");
        assert_eq!(output[1][1], "1999");
    }

    #[test]
    fn test_transform_writes_header_for_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("Gas2021.csv.gz");
        let processed_path = dir.path().join("out.csv.gz");
        write_gzip(&raw_path, &raw_csv(&[]));

        let rows = transform_file(EnergyType::Gas, 2021, &raw_path, &processed_path).unwrap();
        assert_eq!(rows, 0);

        let output = read_gzip_csv(&processed_path);
        assert_eq!(output, vec![PROCESSED_FIELD_NAMES.to_vec()]);
    }

    #[test]
    fn test_transform_rejects_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("Gas2020.csv.gz");
        let processed_path = dir.path().join("out.csv.gz");
        write_gzip(
            &raw_path,
            b"POSTCODE,Number of meters,Consumption (kWh)\nAB1,10,1000\n",
        );

        let err =
            transform_file(EnergyType::Gas, 2020, &raw_path, &processed_path).unwrap_err();
        match err {
            Error::Schema(message) => {
                assert!(message.contains("Mean consumption (kWh)"));
                assert!(message.contains("Median consumption (kWh)"));
            }
            other => panic!("expected a schema error, got: {other}"),
        }
    }

    #[test]
    fn test_transform_rejects_invalid_text() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("Gas2020.csv.gz");
        let processed_path = dir.path().join("out.csv.gz");
        let mut data = raw_csv(&[]);
        data.extend_from_slice(b"AB\xff1,10,1000,100.0,95.5\n");
        write_gzip(&raw_path, &data);

        let err =
            transform_file(EnergyType::Gas, 2020, &raw_path, &processed_path).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)), "got: {err}");
    }
}
