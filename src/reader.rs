//! Chunked streaming parse of a CDR export.
//!
//! The file is consumed in fixed-size row batches so progress can be
//! reported and memory stays bounded on large exports. Batches concatenate
//! in source order; no reordering happens at any stage.

use std::{fs::File, io::BufReader, path::Path};

use csv::ByteRecord;
use encoding_rs::Encoding;
use log::debug;

use crate::{
    error::PipelineError,
    io_utils,
    load::ProgressObserver,
    normalize,
    record::{self, CallRecord, RawRow, REQUIRED_COLUMNS},
};

/// Rows per batch; bounds memory and paces progress reporting.
pub const CHUNK_SIZE: usize = 16;

// Field slots, in REQUIRED_COLUMNS order.
const ORIGINATION: usize = 0;
const CALLING_NUMBER: usize = 1;
const CALLING_LOGIN: usize = 2;
const CALLED_NUMBER: usize = 3;
const CALLED_LOGIN: usize = 4;
const CONNECT: usize = 5;
const DISCONNECT: usize = 6;
const DEVICE_NAME: usize = 7;

type ColumnIndices = [usize; REQUIRED_COLUMNS.len()];

/// Read failures, with decode errors separated so the caller can retry the
/// whole file under a detected encoding.
#[derive(Debug)]
pub(crate) enum ReadError {
    Decode,
    Failed(PipelineError),
}

impl From<PipelineError> for ReadError {
    fn from(err: PipelineError) -> Self {
        ReadError::Failed(err)
    }
}

impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        ReadError::Failed(err.into())
    }
}

impl From<csv::Error> for ReadError {
    fn from(err: csv::Error) -> Self {
        ReadError::Failed(err.into())
    }
}

/// Streams `path` through the sanitizing converters and the timestamp
/// normalizer, one chunk at a time.
pub(crate) fn read_records(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    progress: &dyn ProgressObserver,
) -> Result<Vec<CallRecord>, ReadError> {
    let file = File::open(path)?;
    let mut reader = io_utils::open_csv_reader(BufReader::new(file), delimiter);

    let header_record = reader.byte_headers()?.clone();
    let headers = io_utils::decode_record(&header_record, encoding).ok_or(ReadError::Decode)?;
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut chunk: Vec<RawRow> = Vec::with_capacity(CHUNK_SIZE);
    let mut seen_in_chunk = 0;
    let mut raw = ByteRecord::new();
    while reader.read_byte_record(&mut raw)? {
        let fields = io_utils::decode_record(&raw, encoding).ok_or(ReadError::Decode)?;
        if let Some(row) = parse_row(&fields, &columns)? {
            chunk.push(row);
        }
        seen_in_chunk += 1;
        if seen_in_chunk == CHUNK_SIZE {
            flush_chunk(&mut chunk, &mut records, progress);
            seen_in_chunk = 0;
        }
    }
    if seen_in_chunk > 0 {
        flush_chunk(&mut chunk, &mut records, progress);
    }
    debug!("Parsed {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

fn resolve_columns(headers: &[String]) -> Result<ColumnIndices, ReadError> {
    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| PipelineError::Parse(format!("Spalte '{name}' fehlt")))?;
    }
    Ok(indices)
}

fn parse_row(fields: &[String], columns: &ColumnIndices) -> Result<Option<RawRow>, ReadError> {
    let field = |slot: usize| fields.get(columns[slot]).map(String::as_str).unwrap_or("");

    // a call that never originated is not a record
    let Some(origination) = record::parse_epoch(field(ORIGINATION)) else {
        return Ok(None);
    };

    let row = RawRow {
        origination,
        connect: record::parse_epoch(field(CONNECT)),
        disconnect: record::parse_epoch(field(DISCONNECT)),
        caller_number: record::sanitize_identifier(field(CALLING_NUMBER))?,
        called_number: record::sanitize_identifier(field(CALLED_NUMBER))?,
        caller_login_id: record::sanitize_identifier(field(CALLING_LOGIN))?,
        called_login_id: record::sanitize_identifier(field(CALLED_LOGIN))?,
        device_name: record::sanitize_identifier(field(DEVICE_NAME))?,
    };
    Ok(Some(row))
}

fn flush_chunk(
    chunk: &mut Vec<RawRow>,
    records: &mut Vec<CallRecord>,
    progress: &dyn ProgressObserver,
) {
    let rows = std::mem::take(chunk);
    records.extend(normalize::normalize_rows(rows));
    progress.progress(&format!("{} Zeilen geladen...", records.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_columns_binds_by_name_not_position() {
        let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
        headers.reverse();
        headers.push("extraColumn".to_string());
        let columns = resolve_columns(&headers).expect("resolvable");
        assert_eq!(headers[columns[ORIGINATION]], "dateTimeOrigination");
        assert_eq!(headers[columns[DEVICE_NAME]], "origDeviceName");
    }

    #[test]
    fn resolve_columns_reports_the_missing_column() {
        let headers = vec!["dateTimeOrigination".to_string()];
        match resolve_columns(&headers) {
            Err(ReadError::Failed(PipelineError::Parse(msg))) => {
                assert!(msg.contains("callingPartyNumber"));
            }
            _ => panic!("expected a parse failure"),
        }
    }

    #[test]
    fn rows_without_origination_are_dropped() {
        let columns: ColumnIndices = std::array::from_fn(|idx| idx);
        let fields: Vec<String> = vec![
            "".to_string(),
            "030123".to_string(),
            "jdoe".to_string(),
            "030456".to_string(),
            "".to_string(),
            "1623758400".to_string(),
            "1623758730".to_string(),
            "SEP001122334455".to_string(),
        ];
        assert!(parse_row(&fields, &columns).expect("parses").is_none());

        let mut with_origination = fields.clone();
        with_origination[ORIGINATION] = "1623758400".to_string();
        let row = parse_row(&with_origination, &columns)
            .expect("parses")
            .expect("survives");
        assert_eq!(row.origination, 1_623_758_400);
        assert_eq!(row.device_name, "SEP001122334455");
    }
}
