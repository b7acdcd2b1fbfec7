//! Timestamp reconstruction for the Berlin civil timezone.
//!
//! The vendor export carries bare epoch seconds. Instead of a full tzdata
//! lookup, the shift uses a year-keyed table of the documented DST transition
//! dates for the dataset's jurisdiction: +2h inside the window, +1h outside.
//! Targeting a different jurisdiction means replacing the table, not the
//! algorithm.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike};

use crate::record::{CallRecord, RawRow};

const FULL_FORMAT: &str = "%d.%m.%y %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

/// DST window boundaries as `(month, day, hour)`, keyed by year. Both
/// boundaries fall on a full hour, so hour granularity is exact.
fn dst_window(year: i32) -> ((u32, u32, u32), (u32, u32, u32)) {
    if year <= 2021 {
        ((3, 28, 1), (10, 31, 1))
    } else {
        ((3, 27, 1), (10, 30, 1))
    }
}

/// Shifts a UTC instant into Berlin civil time. The window is half-open:
/// the end instant itself is already standard time.
pub fn to_local(utc: NaiveDateTime) -> NaiveDateTime {
    let (start, end) = dst_window(utc.year());
    let key = (utc.month(), utc.day(), utc.hour());
    let hours = if key >= start && key < end { 2 } else { 1 };
    utc + TimeDelta::hours(hours)
}

fn epoch_to_utc(secs: u32) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(i64::from(secs), 0).map(|dt| dt.naive_utc())
}

/// A zero connect epoch marks a call that never connected; the vendor then
/// records the instant only in the disconnect field.
fn effective_connect(row: &RawRow) -> Option<u32> {
    match row.connect {
        Some(secs) if secs > 0 => Some(secs),
        _ => row.disconnect,
    }
}

/// Rewrites one chunk's time fields and derives durations, in source order.
pub fn normalize_rows(rows: Vec<RawRow>) -> Vec<CallRecord> {
    rows.into_iter().map(normalize_row).collect()
}

fn normalize_row(row: RawRow) -> CallRecord {
    let origination = epoch_to_utc(row.origination).map(to_local);
    let connect = effective_connect(&row).and_then(epoch_to_utc).map(to_local);
    let disconnect = row.disconnect.and_then(epoch_to_utc).map(to_local);

    let duration = match (connect, disconnect) {
        (Some(from), Some(until)) => format_duration(from, until),
        _ => String::new(),
    };

    let render_full = |dt: NaiveDateTime| dt.format(FULL_FORMAT).to_string();

    CallRecord {
        origination_time: origination.map(render_full).unwrap_or_default(),
        connect_time: connect
            .map(|dt| dt.format(TIME_FORMAT).to_string())
            .unwrap_or_default(),
        disconnect_time: disconnect.map(render_full).unwrap_or_default(),
        duration,
        caller_number: row.caller_number,
        called_number: row.called_number,
        caller_login_id: row.caller_login_id,
        called_login_id: row.called_login_id,
        device_name: row.device_name,
    }
}

/// Renders a connect→disconnect span as zero-padded `HH:MM:SS`. Spans that
/// run backwards count as invalid and render empty; spans past a day keep
/// accumulating hours.
fn format_duration(from: NaiveDateTime, until: NaiveDateTime) -> String {
    let secs = (until - from).num_seconds();
    if secs < 0 {
        return String::new();
    }
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}
