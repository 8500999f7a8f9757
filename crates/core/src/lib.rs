//! Core of the slide generator: deck model, payload normalization,
//! markup rendering, and export dispatch.

pub mod config;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use export::{
    DeckFileBuilder, DocumentConverter, ExportFormat, ExportOutcome, Exporter, Unavailable,
};
pub use normalize::{normalize, strip_code_fence, Normalized};
pub use pipeline::{Pipeline, RunReport};
pub use render::MarkupRenderer;
pub use types::{Deck, Slide, SlideKind, MAX_SLIDES};
