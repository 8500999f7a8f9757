//! Error types for the slide generation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop a slide generation run.
///
/// Capability unavailability and slide-count truncation are not errors;
/// they are reported through [`crate::ExportOutcome`] and
/// [`crate::Normalized`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input slide data file does not exist.
    #[error("Slide data not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input is not syntactically valid JSON.
    #[error("Failed to parse slide data: {0}")]
    ParseError(#[from] serde_json::Error),

    /// No slide sequence was found, or the sequence was empty.
    #[error("No slide data in input: {0}")]
    MissingSlides(String),

    /// A slide element has an unusable shape.
    #[error("Slide {index} is invalid: {reason}")]
    InvalidSlide { index: usize, reason: String },

    /// The markup template could not be located.
    #[error("Template '{name}' not found in {}", dir.display())]
    TemplateNotFound { name: String, dir: PathBuf },

    /// The markup template failed to load or render.
    #[error("Template error: {0}")]
    TemplateError(#[from] tera::Error),

    /// A converter was present but failed to produce its output.
    #[error("{format} export failed: {message}")]
    Export {
        format: crate::ExportFormat,
        message: String,
    },

    /// Raised by converter implementations; wrapped into [`Error::Export`]
    /// by the dispatcher.
    #[error("Conversion error: {0}")]
    Conversion(String),
}
