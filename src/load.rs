//! Pipeline entry point: dialect resolution, chunked parse, encoding retry.

use std::path::Path;

use encoding_rs::UTF_8;
use log::{debug, info};

use crate::{
    dialect,
    error::PipelineError,
    reader::{self, ReadError},
    record::CallRecord,
};

/// Observer for advisory progress messages emitted during a load. The
/// pipeline never blocks on the observer and carries no data through it; a
/// no-op implementation is fine.
pub trait ProgressObserver: Send {
    fn progress(&self, message: &str);
}

/// Discards all progress messages.
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn progress(&self, _message: &str) {}
}

/// Loads and normalizes a CDR export into a fresh record set.
///
/// The reader starts in UTF-8; on a decode failure the encoding is resolved
/// statistically and the read is retried exactly once. A second decode
/// failure is fatal for the load.
pub fn load(path: &Path, progress: &dyn ProgressObserver) -> Result<Vec<CallRecord>, PipelineError> {
    if !has_csv_extension(path) {
        return Err(PipelineError::NotCsv);
    }
    let delimiter = dialect::sniff_delimiter(path)?;
    debug!(
        "Sniffed delimiter '{}' for {}",
        crate::printable_delimiter(delimiter),
        path.display()
    );

    match reader::read_records(path, delimiter, UTF_8, progress) {
        Ok(records) => Ok(records),
        Err(ReadError::Failed(err)) => Err(err),
        Err(ReadError::Decode) => {
            progress.progress("Scanne Encoding...");
            let encoding = dialect::detect_encoding(path)?;
            info!(
                "Retrying {} with detected encoding {}",
                path.display(),
                encoding.name()
            );
            progress.progress(&format!("Versuche Encoding '{}'...", encoding.name()));
            match reader::read_records(path, delimiter, encoding, progress) {
                Ok(records) => Ok(records),
                Err(ReadError::Decode) => Err(PipelineError::EncodingUnresolved),
                Err(ReadError::Failed(err)) => Err(err),
            }
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_csv_extensions_pass_the_gate() {
        assert!(has_csv_extension(Path::new("calls.csv")));
        assert!(has_csv_extension(Path::new("calls.CSV")));
        assert!(!has_csv_extension(Path::new("calls.txt")));
        assert!(!has_csv_extension(Path::new("calls")));
    }
}
