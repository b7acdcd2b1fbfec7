//! Delimiter sniffing and reactive encoding detection.
//!
//! Delimiter inference is statistical: a candidate separator wins when every
//! sampled line carries the same non-zero occurrence count. Encoding is only
//! resolved when the default UTF-8 read fails; the second pass streams the
//! raw file through a statistical detector.

use std::{fs::File, io::Read, path::Path};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::debug;

use crate::error::PipelineError;

/// Bytes sampled from the head of the file for delimiter sniffing.
pub const SNIFF_SAMPLE_BYTES: usize = 2048;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];
const DETECTOR_CHUNK_BYTES: usize = 8192;

/// Infers the field delimiter from the first [`SNIFF_SAMPLE_BYTES`] of the
/// file.
pub fn sniff_delimiter(path: &Path) -> Result<u8, PipelineError> {
    let mut file = File::open(path)?;
    let mut sample = vec![0u8; SNIFF_SAMPLE_BYTES];
    let mut filled = 0;
    while filled < sample.len() {
        let n = file.read(&mut sample[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    let truncated = filled == sample.len();
    sample.truncate(filled);
    sniff_delimiter_in(&sample, truncated)
}

fn sniff_delimiter_in(sample: &[u8], truncated: bool) -> Result<u8, PipelineError> {
    let mut lines: Vec<&[u8]> = sample
        .split(|&byte| byte == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect();
    if truncated {
        // the final line may have been cut mid-field
        lines.pop();
    }
    lines.retain(|line| !line.is_empty());
    if lines.is_empty() {
        return Err(PipelineError::DialectUnknown);
    }

    CANDIDATE_DELIMITERS
        .iter()
        .filter_map(|&candidate| {
            let counts = lines
                .iter()
                .map(|line| count_unquoted(line, candidate))
                .collect::<Vec<_>>();
            let uniform = counts[0] > 0 && counts.iter().all_equal();
            uniform.then_some((counts[0], candidate))
        })
        .max()
        .map(|(count, candidate)| {
            debug!(
                "Delimiter 0x{candidate:02x} matched with {count} occurrence(s) per line"
            );
            candidate
        })
        .ok_or(PipelineError::DialectUnknown)
}

/// Occurrences of `delimiter` outside double-quoted regions.
fn count_unquoted(line: &[u8], delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &byte in line {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if byte == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Second-pass resolver: feeds the raw file to a statistical detector in
/// binary chunks and returns its guess.
///
/// The detector yields no usable guess for all-ASCII input (which cannot
/// have failed a UTF-8 read) or when it falls back to UTF-8 itself; both map
/// to [`PipelineError::EncodingUnresolved`].
pub fn detect_encoding(path: &Path) -> Result<&'static Encoding, PipelineError> {
    let mut file = File::open(path)?;
    let mut detector = EncodingDetector::new();
    let mut buffer = [0u8; DETECTOR_CHUNK_BYTES];
    let mut saw_non_ascii = false;
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        saw_non_ascii |= detector.feed(&buffer[..n], false);
    }
    detector.feed(&[], true);
    let guess = detector.guess(None, true);
    if !saw_non_ascii || guess == UTF_8 {
        return Err(PipelineError::EncodingUnresolved);
    }
    debug!("Detected encoding {} for {}", guess.name(), path.display());
    Ok(guess)
}

/// Reports the delimiter and the encoding a load of `path` would use.
pub fn probe(path: &Path) -> Result<(u8, &'static Encoding), PipelineError> {
    let delimiter = sniff_delimiter(path)?;
    let bytes = std::fs::read(path)?;
    if std::str::from_utf8(&bytes).is_ok() {
        Ok((delimiter, UTF_8))
    } else {
        Ok((delimiter, detect_encoding(path)?))
    }
}
