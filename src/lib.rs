pub mod cli;
pub mod dashboard;
pub mod data;
pub mod dataset;
pub mod dedupe;
pub mod error;
pub mod generator;
pub mod io_utils;
pub mod preview;
pub mod profile;
pub mod report;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, GeneratorKind, ReportArgs},
    dataset::Dataset,
    generator::{ReportGenerator, StatisticalReportGenerator},
    report::Report,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_report", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&args),
        Commands::Dedupe(args) => dedupe::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Dashboard(args) => dashboard::execute(&args),
    }
}

/// Parses CSV text and runs the in-process statistical report over it.
pub fn generate_report(csv_text: &str) -> Result<Report> {
    let dataset = Dataset::from_csv_str(csv_text)?;
    Ok(StatisticalReportGenerator.generate(&dataset)?)
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Profiling '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let dataset = Dataset::load(&args.input, delimiter, encoding)
        .with_context(|| format!("Loading dataset from {:?}", args.input))?;

    let rendered = match args.generator {
        GeneratorKind::Statistical => StatisticalReportGenerator
            .generate(&dataset)?
            .render(args.format)?,
        GeneratorKind::Prompt => {
            Report::from_text(generator::render_prompt(&dataset)?).render(args.format)?
        }
    };
    let rendered = if rendered.ends_with('\n') {
        rendered
    } else {
        format!("{rendered}\n")
    };
    io_utils::write_text(args.output.as_deref(), &rendered, encoding_rs::UTF_8)?;
    info!(
        "Report for {} row(s) across {} column(s) written to {}",
        dataset.record_count(),
        dataset.column_count(),
        args.output
            .as_ref()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "stdout".to_string())
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
