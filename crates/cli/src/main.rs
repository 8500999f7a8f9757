//! CLI tool for exporting slide data to HTML, PDF, or PPTX.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slidegen_core::{
    DeckFileBuilder, ExportFormat, ExportOutcome, Pipeline, PipelineConfig, RunReport,
};
use slidegen_pdf::WkhtmltopdfConverter;
use std::path::{Path, PathBuf};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// HTML only
    #[value(alias = "markup")]
    Html,
    /// HTML, then PDF through wkhtmltopdf
    #[value(alias = "document")]
    Pdf,
    /// HTML, then an editable PPTX deck
    #[value(alias = "deckfile")]
    Pptx,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Html => ExportFormat::Markup,
            OutputFormat::Pdf => ExportFormat::Document,
            OutputFormat::Pptx => ExportFormat::DeckFile,
        }
    }
}

/// Generate slides from JSON slide data.
#[derive(Parser, Debug)]
#[command(name = "slidegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Slide data file (JSON object with `slides`, or a bare array)
    #[arg(short, long, default_value = slidegen_core::config::DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory containing the HTML template
    #[arg(long, default_value = slidegen_core::config::DEFAULT_TEMPLATE_DIR)]
    template_dir: PathBuf,

    /// Template file name within the template directory
    #[arg(long, default_value = slidegen_core::config::DEFAULT_TEMPLATE)]
    template: String,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Path to the wkhtmltopdf executable (default: looked up on PATH)
    #[arg(long)]
    wkhtmltopdf: Option<PathBuf>,

    /// PDF page size
    #[arg(long, default_value = "A4")]
    page_size: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let report = run(&args)?;
    print_report(&report);

    Ok(())
}

/// Run the pipeline for the parsed arguments.
fn run(args: &Args) -> Result<RunReport> {
    let config = build_config(args);
    log::debug!("Using {:?}", config);

    let mut document = WkhtmltopdfConverter::new().with_page_size(&args.page_size);
    if let Some(binary) = &args.wkhtmltopdf {
        document = document.with_binary(binary);
    }
    let deck_file = deck_file_builder();

    Pipeline::new(&config, &document, deck_file.as_ref())
        .run(args.format.into())
        .with_context(|| format!("Failed to generate slides from {}", args.input.display()))
}

fn build_config(args: &Args) -> PipelineConfig {
    let config = PipelineConfig::new()
        .with_input(&args.input)
        .with_template_dir(&args.template_dir)
        .with_template(&args.template);

    match &args.out_dir {
        Some(dir) => config.with_output_dir(dir),
        None => config,
    }
}

#[cfg(feature = "pptx")]
fn deck_file_builder() -> Box<dyn DeckFileBuilder> {
    Box::new(slidegen_pptx::PptxWriter::new())
}

#[cfg(not(feature = "pptx"))]
fn deck_file_builder() -> Box<dyn DeckFileBuilder> {
    Box::new(slidegen_core::Unavailable::new(
        "Rebuild slidegen with `--features pptx` to enable PPTX export.",
    ))
}

fn print_report(report: &RunReport) {
    println!("HTML written: {}", absolute(&report.markup_path).display());

    match &report.outcome {
        ExportOutcome::MarkupOnly => {
            println!("Open the HTML file in a browser to view the slides.");
        }
        ExportOutcome::Written { format, path } => {
            println!("{} written: {}", format, absolute(path).display());
        }
        // Logged as a warning by the exporter.
        ExportOutcome::Degraded { .. } => {}
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
