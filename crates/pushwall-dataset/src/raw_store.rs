//! Append-only store of raw analysis results.
//!
//! Each accepted sample occupies three consecutive records in a
//! delimited file: the 11 parameter values, the displacement series, and
//! the base-shear series. The two series rows are ragged (their length
//! depends on how far the analysis converged), so the reader and writer
//! run in flexible mode. Appending never rewrites earlier samples, which
//! makes batch runs resumable; a sample's three rows are written and
//! flushed as one unit so an interrupted run cannot leave a partial
//! sample behind undetected.

use std::{
    fs::OpenOptions,
    io,
    num::ParseFloatError,
    path::Path,
};

use pushwall_model::{CurveLengthError, PARAM_COUNT, PushoverCurve, WallParams};

/// Rows per sample in the raw store.
pub const ROWS_PER_SAMPLE: usize = 3;

/// One accepted sample: the parameter vector and the raw curve it
/// produced. Never mutated after being written.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub params: WallParams,
    pub curve: PushoverCurve,
}

/// Failure reading or writing the raw store.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RawStoreError {
    #[display("failed to open raw store: {_0}")]
    Io(io::Error),
    #[display("failed to read raw store record: {_0}")]
    Csv(csv::Error),
    #[display("raw store record {record}, field {field}: {source}")]
    Float {
        record: usize,
        field: usize,
        source: ParseFloatError,
    },
    #[display("raw store sample {sample} has {count} parameters, expected {PARAM_COUNT}")]
    ParamCount { sample: usize, count: usize },
    #[display("raw store sample {sample}: {source}")]
    SeriesLength {
        sample: usize,
        source: CurveLengthError,
    },
    #[display("raw store ends mid-sample: {trailing} trailing record(s)")]
    Truncated { trailing: usize },
}

fn store_writer<W: io::Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer)
}

fn store_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
}

fn write_record<W: io::Write>(
    writer: &mut csv::Writer<W>,
    values: impl IntoIterator<Item = f64>,
) -> Result<(), RawStoreError> {
    let fields = values.into_iter().map(|v| v.to_string());
    writer.write_record(fields).map_err(RawStoreError::Csv)
}

/// Writes one sample (three records) and flushes.
pub fn write_sample<W: io::Write>(
    writer: &mut csv::Writer<W>,
    sample: &RawSample,
) -> Result<(), RawStoreError> {
    write_record(writer, sample.params.to_array())?;
    write_record(writer, sample.curve.displacement().iter().copied())?;
    write_record(writer, sample.curve.base_shear().iter().copied())?;
    writer.flush().map_err(RawStoreError::Io)
}

/// Appends one sample to the store at `path`, creating the file on
/// first use.
pub fn append_sample(path: &Path, sample: &RawSample) -> Result<(), RawStoreError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(RawStoreError::Io)?;
    let mut writer = store_writer(file);
    write_sample(&mut writer, sample)
}

/// Reads every sample from a raw store, preserving store order.
pub fn read_samples<R: io::Read>(reader: R) -> Result<Vec<RawSample>, RawStoreError> {
    let mut records = Vec::new();
    for (record_index, record) in store_reader(reader).records().enumerate() {
        let record = record.map_err(RawStoreError::Csv)?;
        let mut values = Vec::with_capacity(record.len());
        for (field, text) in record.iter().enumerate() {
            let value = text.trim().parse().map_err(|source| RawStoreError::Float {
                record: record_index,
                field,
                source,
            })?;
            values.push(value);
        }
        records.push(values);
    }

    let trailing = records.len() % ROWS_PER_SAMPLE;
    if trailing != 0 {
        return Err(RawStoreError::Truncated { trailing });
    }

    let mut samples = Vec::with_capacity(records.len() / ROWS_PER_SAMPLE);
    for (sample_index, rows) in records.chunks_exact(ROWS_PER_SAMPLE).enumerate() {
        let param_row = &rows[0];
        let params: [f64; PARAM_COUNT] =
            param_row
                .as_slice()
                .try_into()
                .map_err(|_| RawStoreError::ParamCount {
                    sample: sample_index,
                    count: param_row.len(),
                })?;
        let curve = PushoverCurve::new(rows[1].clone(), rows[2].clone()).map_err(|source| {
            RawStoreError::SeriesLength {
                sample: sample_index,
                source,
            }
        })?;
        samples.push(RawSample {
            params: WallParams::from_array(params),
            curve,
        });
    }
    Ok(samples)
}

/// Reads every sample from the store file at `path`.
pub fn read_samples_from_path(path: &Path) -> Result<Vec<RawSample>, RawStoreError> {
    let file = std::fs::File::open(path).map_err(RawStoreError::Io)?;
    read_samples(io::BufReader::new(file))
}
