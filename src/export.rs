//! CSV export of a table view.
//!
//! The pipeline hands a view's column labels and row collection, unchanged,
//! to the document writer; only the label markup is stripped on the way out.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{
    io_utils,
    project::{TableView, strip_size_tags},
};

/// Writes the view's labels and rows as CSV to `output` (stdout if `None`).
pub fn write_table(
    view: &TableView,
    output: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(output, delimiter, encoding)?;
    let labels = view
        .columns
        .iter()
        .map(|col| strip_size_tags(&col.label))
        .collect::<Vec<_>>();
    writer.write_record(&labels).context("Writing header row")?;
    for row in &view.rows {
        writer.write_record(row).context("Writing data row")?;
    }
    writer.flush().context("Flushing export output")?;
    Ok(())
}
