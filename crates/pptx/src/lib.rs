//! PPTX (Office Open XML) backend for deck files.
//!
//! Writes one slide per deck slide using a single title-and-content layout,
//! and reads such files back for verification.

mod package;
pub mod reader;
pub mod writer;

pub use reader::PptxReader;
pub use writer::PptxWriter;
