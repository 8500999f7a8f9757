//! PDF backend: converts the rendered HTML with an external `wkhtmltopdf`.

pub mod converter;

pub use converter::{Orientation, WkhtmltopdfConverter};
