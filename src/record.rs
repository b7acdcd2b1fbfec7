//! Raw and canonical call records, and the per-field sanitizing converters.

use crate::error::PipelineError;

/// Columns the vendor export must carry, in the order the reader binds them.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "dateTimeOrigination",
    "callingPartyNumber",
    "callingPartyUnicodeLoginUserID",
    "originalCalledPartyNumber",
    "finalCalledPartyUnicodeLoginUserID",
    "dateTimeConnect",
    "dateTimeDisconnect",
    "origDeviceName",
];

/// One CSV line after field sanitizing, before timestamp normalization.
/// Rows without an origination timestamp never become a `RawRow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub origination: u32,
    pub connect: Option<u32>,
    pub disconnect: Option<u32>,
    pub caller_number: String,
    pub called_number: String,
    pub caller_login_id: String,
    pub called_login_id: String,
    pub device_name: String,
}

/// Canonical unit of the pipeline. All fields are display-ready strings;
/// unusable source values are the empty string, never null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// `DD.MM.YY HH:MM:SS`, target timezone.
    pub origination_time: String,
    /// `HH:MM:SS`, or empty if the call never connected.
    pub connect_time: String,
    /// `DD.MM.YY HH:MM:SS`, or empty if no disconnect was recorded.
    pub disconnect_time: String,
    /// `HH:MM:SS`, or empty if either endpoint was missing or invalid.
    pub duration: String,
    pub caller_number: String,
    pub called_number: String,
    pub caller_login_id: String,
    pub called_login_id: String,
    pub device_name: String,
}

impl CallRecord {
    /// Resolves a source column name (or `duration`) to its display value.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "dateTimeOrigination" => &self.origination_time,
            "callingPartyNumber" => &self.caller_number,
            "callingPartyUnicodeLoginUserID" => &self.caller_login_id,
            "originalCalledPartyNumber" => &self.called_number,
            "finalCalledPartyUnicodeLoginUserID" => &self.called_login_id,
            "dateTimeConnect" => &self.connect_time,
            "dateTimeDisconnect" => &self.disconnect_time,
            "origDeviceName" => &self.device_name,
            "duration" => &self.duration,
            _ => return None,
        };
        Some(value)
    }
}

/// Repairs an identifier/name field from the vendor export.
///
/// Values shorter than two characters or containing a backslash are unusable
/// and collapse to the empty string. The exporting PBX renders some numbers
/// in scientific notation with a comma decimal separator; those come back as
/// a signed integer string.
pub fn sanitize_identifier(value: &str) -> Result<String, PipelineError> {
    if value.chars().count() < 2 || value.contains('\\') {
        return Ok(String::new());
    }
    if value.contains("E+") {
        let normalized = value.replace(',', ".");
        let parsed: f64 = normalized
            .parse()
            .map_err(|_| PipelineError::Parse(format!("Ungültiger Zahlenwert '{value}'")))?;
        return Ok(format!("+{}", parsed as i64));
    }
    Ok(value.to_string())
}

/// Parses an epoch-second field; empty or malformed values count as unset.
pub fn parse_epoch(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
