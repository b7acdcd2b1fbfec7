//! Display projections of a normalized record set.
//!
//! A [`TableView`] is disposable: rebuilt on every load and every filter,
//! never persisted. Labels in the reduced projection carry a `[size=N]`
//! annotation and a dp width hint for the rendering layer; the mapping from
//! display label to record field stays stable for the query evaluator.

use std::sync::OnceLock;

use regex::Regex;

use crate::record::CallRecord;

/// Reduced-mode display columns: label → source field, in fixed order.
pub const DISPLAY_COLUMNS: [(&str, &str); 6] = [
    ("Zeitstempel", "dateTimeOrigination"),
    ("Anrufer", "callingPartyNumber"),
    ("Gewählte Nummer", "originalCalledPartyNumber"),
    ("Verbunden um", "dateTimeConnect"),
    ("Dauer", "duration"),
    ("Gerät", "origDeviceName"),
];

/// Width hints (dp), paired with [`DISPLAY_COLUMNS`].
const DISPLAY_WIDTHS: [f32; 6] = [35.0, 35.0, 39.0, 32.0, 25.0, 49.0];

const LABEL_TEXT_SIZE: u32 = 20;

/// Full-mode columns: every normalized field under its source name.
pub const FULL_COLUMNS: [&str; 9] = [
    "dateTimeOrigination",
    "callingPartyNumber",
    "callingPartyUnicodeLoginUserID",
    "originalCalledPartyNumber",
    "finalCalledPartyUnicodeLoginUserID",
    "dateTimeConnect",
    "dateTimeDisconnect",
    "origDeviceName",
    "duration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Every normalized field, raw column names, no width hints.
    Full,
    /// Six curated columns with annotated labels and width hints.
    Reduced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    /// Display width hint (dp); interpreted by the rendering layer.
    pub width: Option<f32>,
}

/// Display-ready projection of a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

pub fn project(records: &[CallRecord], mode: ProjectionMode) -> TableView {
    match mode {
        ProjectionMode::Full => TableView {
            columns: FULL_COLUMNS
                .iter()
                .map(|name| Column {
                    label: (*name).to_string(),
                    width: None,
                })
                .collect(),
            rows: records
                .iter()
                .map(|record| row_for(record, FULL_COLUMNS.into_iter()))
                .collect(),
        },
        ProjectionMode::Reduced => TableView {
            columns: DISPLAY_COLUMNS
                .iter()
                .zip(DISPLAY_WIDTHS)
                .map(|((label, _), width)| Column {
                    label: format!("[size={LABEL_TEXT_SIZE}]{label}[/size]"),
                    width: Some(width),
                })
                .collect(),
            rows: records
                .iter()
                .map(|record| row_for(record, DISPLAY_COLUMNS.into_iter().map(|(_, field)| field)))
                .collect(),
        },
    }
}

fn row_for<'a>(record: &CallRecord, fields: impl Iterator<Item = &'a str>) -> Vec<String> {
    fields
        .map(|name| record.field(name).unwrap_or_default().to_string())
        .collect()
}

/// Maps a display label to its record field, for column-scoped queries.
pub fn field_for_label(label: &str) -> Option<&'static str> {
    DISPLAY_COLUMNS
        .iter()
        .find(|(display, _)| *display == label)
        .map(|(_, field)| *field)
}

static SIZE_TAG: OnceLock<Regex> = OnceLock::new();

/// Removes the `[size=N]`/`[/size]` markup from a column label.
pub fn strip_size_tags(label: &str) -> String {
    let pattern = SIZE_TAG.get_or_init(|| {
        Regex::new(r"\[size=\d+\]|\[/size\]").expect("size-tag pattern is valid")
    });
    pattern.replace_all(label, "").into_owned()
}
