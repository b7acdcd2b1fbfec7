use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Inspect Cisco CUCM call detail record exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the sniffed delimiter and text encoding of an export
    Probe(ProbeArgs),
    /// Load an export and render the call table
    View(ViewArgs),
    /// Load an export and write the normalized table as CSV
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CDR export to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

const SEARCH_HELP: &str = "\
Search terms match case-insensitively as literal substrings across all
display columns:

  90123              every row containing the digits anywhere

Prefix a display column name with a colon to scope the match to that column:

  Anrufer:90123      rows whose caller number contains 90123

Column names: Zeitstempel, Anrufer, Gewählte Nummer, Verbunden um, Dauer,
Gerät. Terms whose colon follows a digit (10:30:00) stay full-text searches.
Wildcards are not supported.";

#[derive(Debug, Args)]
#[command(after_long_help = SEARCH_HELP)]
pub struct ViewArgs {
    /// Input CDR export (.csv)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Search expression, optionally column-scoped (`Anrufer:90123`)
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,
    /// Show every normalized column instead of the curated view
    #[arg(long)]
    pub full: bool,
    /// Limit number of rows rendered
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
#[command(after_long_help = SEARCH_HELP)]
pub struct ExportArgs {
    /// Input CDR export (.csv)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Search expression applied before the export
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,
    /// Delimiter for the output file
    #[arg(long = "output-delimiter", value_parser = parse_delimiter, default_value = ",")]
    pub output_delimiter: u8,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    /// Export the curated six-column view instead of every field
    #[arg(long)]
    pub reduced: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_accepts_names_and_characters() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("pipe").unwrap(), b'|');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("ä").is_err());
    }
}
