//! Processed dataset store: one CSV row per sample.
//!
//! A row is the 11 parameter values followed by the 6 discretized
//! base-shear values (the pinned zero at station 0 carries no
//! information and is dropped), 17 comma-delimited numeric fields in
//! total. The store is written once, by a single batch process, before
//! training begins.

use std::{io, num::ParseFloatError, path::Path};

use pushwall_model::{PARAM_COUNT, WallParams};

use crate::stations::{STATION_COUNT, TARGET_COUNT};

/// Numeric fields per processed row.
pub const FIELD_COUNT: usize = PARAM_COUNT + TARGET_COUNT;

/// One unit of training data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessedRow {
    pub params: WallParams,
    /// Base shear at stations 1..7, in kN.
    pub targets: [f64; TARGET_COUNT],
}

impl ProcessedRow {
    /// Builds a row from a full discretized curve, dropping the pinned
    /// zero at station 0.
    #[must_use]
    pub fn from_discretized(params: WallParams, values: [f64; STATION_COUNT]) -> Self {
        let mut targets = [0.0; TARGET_COUNT];
        targets.copy_from_slice(&values[1..]);
        Self { params, targets }
    }

    #[must_use]
    pub fn to_fields(&self) -> [f64; FIELD_COUNT] {
        let mut fields = [0.0; FIELD_COUNT];
        fields[..PARAM_COUNT].copy_from_slice(&self.params.to_array());
        fields[PARAM_COUNT..].copy_from_slice(&self.targets);
        fields
    }

    #[must_use]
    pub fn from_fields(fields: [f64; FIELD_COUNT]) -> Self {
        let mut params = [0.0; PARAM_COUNT];
        params.copy_from_slice(&fields[..PARAM_COUNT]);
        let mut targets = [0.0; TARGET_COUNT];
        targets.copy_from_slice(&fields[PARAM_COUNT..]);
        Self {
            params: WallParams::from_array(params),
            targets,
        }
    }
}

/// Failure reading or writing the processed store.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ProcessedStoreError {
    #[display("failed to open processed store: {_0}")]
    Io(io::Error),
    #[display("failed to read processed store record: {_0}")]
    Csv(csv::Error),
    #[display("processed store row {row}, field {field}: {source}")]
    Float {
        row: usize,
        field: usize,
        source: ParseFloatError,
    },
    #[display("processed store row {row} has {count} fields, expected {FIELD_COUNT}")]
    FieldCount { row: usize, count: usize },
}

/// Writes rows as 17-field CSV records.
pub fn write_rows<W: io::Write>(
    writer: W,
    rows: &[ProcessedRow],
) -> Result<(), ProcessedStoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in rows {
        let fields = row.to_fields().map(|v| v.to_string());
        writer
            .write_record(&fields)
            .map_err(ProcessedStoreError::Csv)?;
    }
    writer.flush().map_err(ProcessedStoreError::Io)
}

/// Writes rows to the file at `path`, replacing any previous content.
pub fn write_rows_to_path(path: &Path, rows: &[ProcessedRow]) -> Result<(), ProcessedStoreError> {
    let file = std::fs::File::create(path).map_err(ProcessedStoreError::Io)?;
    write_rows(io::BufWriter::new(file), rows)
}

/// Reads every row, preserving file order.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<ProcessedRow>, ProcessedStoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(ProcessedStoreError::Csv)?;
        if record.len() != FIELD_COUNT {
            return Err(ProcessedStoreError::FieldCount {
                row: row_index,
                count: record.len(),
            });
        }
        let mut fields = [0.0; FIELD_COUNT];
        for (field, text) in record.iter().enumerate() {
            fields[field] = text
                .trim()
                .parse()
                .map_err(|source| ProcessedStoreError::Float {
                    row: row_index,
                    field,
                    source,
                })?;
        }
        rows.push(ProcessedRow::from_fields(fields));
    }
    Ok(rows)
}

/// Reads every row from the file at `path`.
pub fn read_rows_from_path(path: &Path) -> Result<Vec<ProcessedRow>, ProcessedStoreError> {
    let file = std::fs::File::open(path).map_err(ProcessedStoreError::Io)?;
    read_rows(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use pushwall_model::ParamBounds;

    use super::*;

    fn row(scale: f64) -> ProcessedRow {
        ProcessedRow {
            params: ParamBounds::reference().mins,
            targets: [100.0, 200.0, 300.0, 400.0, 500.0, 600.0].map(|v| v * scale),
        }
    }

    #[test]
    fn test_from_discretized_drops_station_zero() {
        let params = ParamBounds::reference().mins;
        let row =
            ProcessedRow::from_discretized(params, [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(row.targets, [10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn test_write_read_roundtrip() {
        let rows = vec![row(1.0), row(2.0), row(0.5)];
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &rows).unwrap();
        assert_eq!(read_rows(buffer.as_slice()).unwrap(), rows);
    }

    #[test]
    fn test_short_row_is_detected() {
        let data = "1,2,3,4\n";
        let err = read_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ProcessedStoreError::FieldCount { row: 0, count: 4 }
        ));
    }

    #[test]
    fn test_non_numeric_field_is_detected() {
        let data = "1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,oops\n";
        let err = read_rows(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ProcessedStoreError::Float { row: 0, field: 16, .. }
        ));
    }
}
