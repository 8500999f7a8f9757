//! Run-scoped file locations.

use std::path::{Path, PathBuf};

/// Default input slide data file.
pub const DEFAULT_INPUT: &str = "slides.json";
/// Default template directory.
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
/// Default template name.
pub const DEFAULT_TEMPLATE: &str = "base.html";
/// Default markup output file.
pub const DEFAULT_MARKUP_OUTPUT: &str = "output.html";
/// Default document output file.
pub const DEFAULT_DOCUMENT_OUTPUT: &str = "output.pdf";
/// Default deck-file output file.
pub const DEFAULT_DECK_FILE_OUTPUT: &str = "output.pptx";

/// Where a run reads its inputs and writes its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Slide data file.
    pub input: PathBuf,

    /// Directory searched for templates.
    pub template_dir: PathBuf,

    /// Template name within `template_dir`.
    pub template: String,

    /// Markup output, always written.
    pub markup_output: PathBuf,

    /// Document output, written for the document format.
    pub document_output: PathBuf,

    /// Deck-file output, written for the deck-file format.
    pub deck_file_output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            template: DEFAULT_TEMPLATE.to_string(),
            markup_output: PathBuf::from(DEFAULT_MARKUP_OUTPUT),
            document_output: PathBuf::from(DEFAULT_DOCUMENT_OUTPUT),
            deck_file_output: PathBuf::from(DEFAULT_DECK_FILE_OUTPUT),
        }
    }
}

impl PipelineConfig {
    /// Create a config with the default locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide data file.
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    /// Set the template directory.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Set the template name.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Place all three outputs in `dir`, keeping their file names.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.markup_output = rebase(dir, &self.markup_output);
        self.document_output = rebase(dir, &self.document_output);
        self.deck_file_output = rebase(dir, &self.deck_file_output);
        self
    }
}

fn rebase(dir: &Path, path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.join(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.input, PathBuf::from("slides.json"));
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert_eq!(config.template, "base.html");
        assert_eq!(config.markup_output, PathBuf::from("output.html"));
    }

    #[test]
    fn test_with_output_dir() {
        let config = PipelineConfig::new().with_output_dir("build");
        assert_eq!(config.markup_output, Path::new("build").join("output.html"));
        assert_eq!(config.document_output, Path::new("build").join("output.pdf"));
        assert_eq!(config.deck_file_output, Path::new("build").join("output.pptx"));
    }
}
