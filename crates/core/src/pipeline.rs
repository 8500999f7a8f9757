//! One slide generation run: read, normalize, render, export.

use crate::{
    normalize, DeckFileBuilder, DocumentConverter, Error, ExportFormat, ExportOutcome, Exporter,
    MarkupRenderer, PipelineConfig, Result, MAX_SLIDES,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Slides in the rendered deck.
    pub slide_count: usize,

    /// Slide count of the input, if it was over the cap.
    pub truncated_from: Option<usize>,

    /// Where the markup was written.
    pub markup_path: PathBuf,

    /// Result of the format-specific export.
    pub outcome: ExportOutcome,
}

/// Runs the pipeline against one config and one pair of converters.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    document: &'a dyn DocumentConverter,
    deck_file: &'a dyn DeckFileBuilder,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline.
    pub fn new(
        config: &'a PipelineConfig,
        document: &'a dyn DocumentConverter,
        deck_file: &'a dyn DeckFileBuilder,
    ) -> Self {
        Self {
            config,
            document,
            deck_file,
        }
    }

    /// Read the configured input file and run.
    pub fn run(&self, format: ExportFormat) -> Result<RunReport> {
        let raw = read_input(&self.config.input)?;
        self.run_payload(&raw, format)
    }

    /// Run on slide data already in memory, such as a model response.
    pub fn run_payload(&self, raw: &str, format: ExportFormat) -> Result<RunReport> {
        let normalized = normalize(raw)?;
        let truncated_from = normalized.truncated().then_some(normalized.original_count);
        if let Some(count) = truncated_from {
            log::warn!(
                "Input has {} slides; only the first {} are used",
                count,
                MAX_SLIDES
            );
        }
        let deck = normalized.deck;
        log::debug!("Normalized {} slides", deck.len());

        let renderer = MarkupRenderer::new(&self.config.template_dir, &self.config.template)?;
        let html = renderer.render(&deck)?;

        let markup_path = self.config.markup_output.clone();
        write_output(&markup_path, &html)?;
        log::info!("HTML written: {}", markup_path.display());

        let exporter = Exporter::new(
            self.document,
            self.deck_file,
            &self.config.document_output,
            &self.config.deck_file_output,
        );
        let outcome = exporter.export(&deck, &markup_path, format)?;

        Ok(RunReport {
            slide_count: deck.len(),
            truncated_from,
            markup_path,
            outcome,
        })
    }
}

/// Read the slide data file.
fn read_input(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::InputNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Write an output file, creating its directory if needed.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
