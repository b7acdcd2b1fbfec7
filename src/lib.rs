pub mod cli;
pub mod dialect;
pub mod error;
pub mod export;
pub mod io_utils;
pub mod load;
pub mod normalize;
pub mod project;
pub mod query;
pub mod reader;
pub mod record;
pub mod session;
pub mod table;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands},
    error::PipelineError,
    load::ProgressObserver,
    project::ProjectionMode,
    record::CallRecord,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("cdrview", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::View(args) => handle_view(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

/// Routes worker progress messages into the log.
struct LogProgress;

impl ProgressObserver for LogProgress {
    fn progress(&self, message: &str) {
        info!("{message}");
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let (delimiter, encoding) = dialect::probe(&args.input).map_err(report_to_anyhow)?;
    info!(
        "'{}': delimiter '{}', encoding {}",
        args.input.display(),
        printable_delimiter(delimiter),
        encoding.name()
    );
    Ok(())
}

fn handle_view(args: &cli::ViewArgs) -> Result<()> {
    let mut records = load_records(&args.input, args.search.as_deref())?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }
    let mode = if args.full {
        ProjectionMode::Full
    } else {
        ProjectionMode::Reduced
    };
    let view = project::project(&records, mode);
    info!("Rendering {} record(s)", view.rows.len());
    table::print_table(&view);
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let records = load_records(&args.input, args.search.as_deref())?;
    let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let mode = if args.reduced {
        ProjectionMode::Reduced
    } else {
        ProjectionMode::Full
    };
    let view = project::project(&records, mode);
    export::write_table(&view, args.output.as_deref(), args.output_delimiter, encoding)
        .with_context(|| format!("Exporting {:?}", args.input))?;
    info!("Exported {} row(s)", view.rows.len());
    Ok(())
}

/// Runs the load on its worker thread and applies an optional search filter
/// to the finished record set.
fn load_records(input: &Path, search: Option<&str>) -> Result<Vec<CallRecord>> {
    let handle = session::spawn_load(input.to_path_buf(), LogProgress);
    let records = handle.wait().map_err(report_to_anyhow)?;
    info!("Loaded {} record(s)", records.len());
    match search {
        Some(text) => {
            let filtered = query::filter(&records, text).map_err(report_to_anyhow)?;
            Ok(filtered.unwrap_or(records))
        }
        None => Ok(records),
    }
}

fn report_to_anyhow(err: PipelineError) -> anyhow::Error {
    let report = err.report();
    anyhow!("{}: {}", report.title, report.message)
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
