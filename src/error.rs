//! Pipeline failure taxonomy.
//!
//! Every failure inside a load or filter operation is recovered at the
//! pipeline boundary into one of these variants; nothing crosses into the
//! presentation layer as a panic or a raw library error. A failed load never
//! touches the previously displayed record set.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// File extension/content is not a recognized CSV; nothing was parsed.
    #[error("Datei ist keine CSV-Datei")]
    NotCsv,

    /// Delimiter sniffing failed on the file header sample.
    #[error("Trennzeichen konnte nicht ermittelt werden")]
    DialectUnknown,

    /// Both the default and the detected encoding fail to decode the file.
    #[error("Encoding der Datei konnte nicht bestimmt werden")]
    EncodingUnresolved,

    /// Any other row-level or library-level failure during the load.
    #[error("Datei kann nicht geladen werden: {0}")]
    Parse(String),

    /// A column-scoped query tag does not match any display column.
    #[error("Ungültiger Spaltenname: '{0}'")]
    InvalidColumnName(String),
}

impl PipelineError {
    /// Converts the error into the `(title, message)` shape the presentation
    /// layer displays.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            title: "Fehler".to_string(),
            message: self.to_string(),
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Parse(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Parse(err.to_string())
    }
}

/// Structured user-facing error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub title: String,
    pub message: String,
}
