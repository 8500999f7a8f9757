//! Export dispatch to the requested output format.
//!
//! The markup file is always written before dispatch. The document and
//! deck-file formats go through injected converters, each of which can
//! report itself unavailable; in that case the run degrades to markup only.

use crate::{Deck, Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Browser-viewable HTML only.
    #[default]
    Markup,
    /// Paginated PDF converted from the markup file.
    Document,
    /// Editable PPTX built from the deck.
    DeckFile,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markup => "HTML",
            Self::Document => "PDF",
            Self::DeckFile => "PPTX",
        })
    }
}

/// Converts a markup file into a paginated document.
pub trait DocumentConverter {
    /// Check if the converter is installed and usable.
    fn is_available(&self) -> bool;

    /// How to make the converter available, shown when it is not.
    fn remedy(&self) -> String;

    /// Convert `markup` into a document at `dest`.
    ///
    /// Must not leave a file at `dest` on failure.
    fn to_document(&self, markup: &Path, dest: &Path) -> Result<()>;
}

/// Builds a deck file from a canonical deck.
pub trait DeckFileBuilder {
    /// Check if the builder is usable.
    fn is_available(&self) -> bool;

    /// How to make the builder available, shown when it is not.
    fn remedy(&self) -> String;

    /// Write one page per slide, in order, to `dest`.
    ///
    /// Must not leave a file at `dest` on failure.
    fn to_deck_file(&self, deck: &Deck, dest: &Path) -> Result<()>;
}

/// A capability that is never available, for builds without a converter.
#[derive(Debug, Clone)]
pub struct Unavailable {
    remedy: String,
}

impl Unavailable {
    /// Create an unavailable capability with the given remedy text.
    pub fn new(remedy: impl Into<String>) -> Self {
        Self {
            remedy: remedy.into(),
        }
    }

    fn unavailable(&self) -> Error {
        Error::Conversion(format!("capability unavailable: {}", self.remedy))
    }
}

impl DocumentConverter for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn remedy(&self) -> String {
        self.remedy.clone()
    }

    fn to_document(&self, _markup: &Path, _dest: &Path) -> Result<()> {
        Err(self.unavailable())
    }
}

impl DeckFileBuilder for Unavailable {
    fn is_available(&self) -> bool {
        false
    }

    fn remedy(&self) -> String {
        self.remedy.clone()
    }

    fn to_deck_file(&self, _deck: &Deck, _dest: &Path) -> Result<()> {
        Err(self.unavailable())
    }
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Only markup was requested; nothing further to do.
    MarkupOnly,
    /// The requested artifact was written.
    Written { format: ExportFormat, path: PathBuf },
    /// The converter is missing; only the markup exists.
    Degraded { format: ExportFormat, remedy: String },
}

/// Dispatches a deck to exactly one export format.
pub struct Exporter<'a> {
    document: &'a dyn DocumentConverter,
    deck_file: &'a dyn DeckFileBuilder,
    document_path: PathBuf,
    deck_file_path: PathBuf,
}

impl<'a> Exporter<'a> {
    /// Create an exporter with the given converters and destinations.
    pub fn new(
        document: &'a dyn DocumentConverter,
        deck_file: &'a dyn DeckFileBuilder,
        document_path: impl Into<PathBuf>,
        deck_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document,
            deck_file,
            document_path: document_path.into(),
            deck_file_path: deck_file_path.into(),
        }
    }

    /// Export the deck.
    ///
    /// `markup_path` must already hold the rendered markup. Converter
    /// failures are fatal and reported as [`Error::Export`]; a missing
    /// converter is not.
    pub fn export(
        &self,
        deck: &Deck,
        markup_path: &Path,
        format: ExportFormat,
    ) -> Result<ExportOutcome> {
        match format {
            ExportFormat::Markup => Ok(ExportOutcome::MarkupOnly),
            ExportFormat::Document => self.export_document(markup_path),
            ExportFormat::DeckFile => self.export_deck_file(deck),
        }
    }

    fn export_document(&self, markup_path: &Path) -> Result<ExportOutcome> {
        let format = ExportFormat::Document;
        if !self.document.is_available() {
            return Ok(degraded(format, self.document.remedy()));
        }

        log::debug!(
            "Converting {} to {}",
            markup_path.display(),
            self.document_path.display()
        );
        self.document
            .to_document(markup_path, &self.document_path)
            .map_err(|e| execution_error(format, e))?;

        Ok(ExportOutcome::Written {
            format,
            path: self.document_path.clone(),
        })
    }

    fn export_deck_file(&self, deck: &Deck) -> Result<ExportOutcome> {
        let format = ExportFormat::DeckFile;
        if !self.deck_file.is_available() {
            return Ok(degraded(format, self.deck_file.remedy()));
        }

        log::debug!(
            "Building {} slides into {}",
            deck.len(),
            self.deck_file_path.display()
        );
        self.deck_file
            .to_deck_file(deck, &self.deck_file_path)
            .map_err(|e| execution_error(format, e))?;

        Ok(ExportOutcome::Written {
            format,
            path: self.deck_file_path.clone(),
        })
    }
}

fn degraded(format: ExportFormat, remedy: String) -> ExportOutcome {
    log::warn!(
        "{} export is unavailable; only the HTML output was written. {}",
        format,
        remedy
    );
    ExportOutcome::Degraded { format, remedy }
}

fn execution_error(format: ExportFormat, error: Error) -> Error {
    match error {
        Error::Export { .. } => error,
        Error::Conversion(message) => Error::Export { format, message },
        other => Error::Export {
            format,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{Slide, SlideKind};
    use std::cell::RefCell;
    use std::fs;

    /// Converter double that records calls and writes a marker file.
    pub(crate) struct FakeConverter {
        pub available: bool,
        pub fail: bool,
        pub calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeConverter {
        pub fn new(available: bool, fail: bool) -> Self {
            Self {
                available,
                fail,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn run(&self, dest: &Path, content: String) -> Result<()> {
            self.calls.borrow_mut().push(dest.to_path_buf());
            if self.fail {
                return Err(Error::Conversion("converter crashed".to_string()));
            }
            fs::write(dest, content)?;
            Ok(())
        }
    }

    impl DocumentConverter for FakeConverter {
        fn is_available(&self) -> bool {
            self.available
        }

        fn remedy(&self) -> String {
            "install the fake converter".to_string()
        }

        fn to_document(&self, markup: &Path, dest: &Path) -> Result<()> {
            let html = fs::read_to_string(markup)?;
            self.run(dest, format!("PDF:{}", html))
        }
    }

    impl DeckFileBuilder for FakeConverter {
        fn is_available(&self) -> bool {
            self.available
        }

        fn remedy(&self) -> String {
            "install the fake builder".to_string()
        }

        fn to_deck_file(&self, deck: &Deck, dest: &Path) -> Result<()> {
            let titles: Vec<&str> = deck.slides().iter().map(|s| s.title.as_str()).collect();
            self.run(dest, titles.join("|"))
        }
    }

    fn deck() -> Deck {
        Deck::new(vec![
            Slide::new(SlideKind::Title, "One", ""),
            Slide::new(SlideKind::Content, "Two", "body"),
        ])
        .unwrap()
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ExportFormat::default(), ExportFormat::Markup);
        assert_eq!(ExportFormat::Document.to_string(), "PDF");
        assert_eq!(ExportFormat::DeckFile.to_string(), "PPTX");
    }

    #[test]
    fn test_markup_format_touches_no_converter() {
        let dir = tempfile::tempdir().unwrap();
        let document = FakeConverter::new(true, false);
        let deck_file = FakeConverter::new(true, false);
        let exporter = Exporter::new(
            &document,
            &deck_file,
            dir.path().join("out.pdf"),
            dir.path().join("out.pptx"),
        );

        let outcome = exporter
            .export(&deck(), &dir.path().join("out.html"), ExportFormat::Markup)
            .unwrap();

        assert_eq!(outcome, ExportOutcome::MarkupOnly);
        assert!(document.calls.borrow().is_empty());
        assert!(deck_file.calls.borrow().is_empty());
    }

    #[test]
    fn test_document_export() {
        let dir = tempfile::tempdir().unwrap();
        let markup = dir.path().join("out.html");
        fs::write(&markup, "<h1>One</h1>").unwrap();
        let document = FakeConverter::new(true, false);
        let deck_file = FakeConverter::new(true, false);
        let exporter = Exporter::new(
            &document,
            &deck_file,
            dir.path().join("out.pdf"),
            dir.path().join("out.pptx"),
        );

        let outcome = exporter
            .export(&deck(), &markup, ExportFormat::Document)
            .unwrap();

        assert_eq!(
            outcome,
            ExportOutcome::Written {
                format: ExportFormat::Document,
                path: dir.path().join("out.pdf"),
            }
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("out.pdf")).unwrap(),
            "PDF:<h1>One</h1>"
        );
        assert!(deck_file.calls.borrow().is_empty());
    }

    #[test]
    fn test_deck_file_export() {
        let dir = tempfile::tempdir().unwrap();
        let document = FakeConverter::new(true, false);
        let deck_file = FakeConverter::new(true, false);
        let exporter = Exporter::new(
            &document,
            &deck_file,
            dir.path().join("out.pdf"),
            dir.path().join("out.pptx"),
        );

        exporter
            .export(&deck(), &dir.path().join("out.html"), ExportFormat::DeckFile)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("out.pptx")).unwrap(),
            "One|Two"
        );
        assert!(document.calls.borrow().is_empty());
    }

    #[test]
    fn test_unavailable_converter_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let document = FakeConverter::new(false, false);
        let deck_file = Unavailable::new("rebuild with the `pptx` feature");
        let exporter = Exporter::new(
            &document,
            &deck_file,
            dir.path().join("out.pdf"),
            dir.path().join("out.pptx"),
        );

        let outcome = exporter
            .export(&deck(), &dir.path().join("out.html"), ExportFormat::Document)
            .unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Degraded {
                format: ExportFormat::Document,
                remedy: "install the fake converter".to_string(),
            }
        );
        assert!(document.calls.borrow().is_empty());

        let outcome = exporter
            .export(&deck(), &dir.path().join("out.html"), ExportFormat::DeckFile)
            .unwrap();
        assert!(matches!(
            outcome,
            ExportOutcome::Degraded {
                format: ExportFormat::DeckFile,
                ..
            }
        ));
        assert!(!dir.path().join("out.pdf").exists());
        assert!(!dir.path().join("out.pptx").exists());
    }

    #[test]
    fn test_converter_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let document = FakeConverter::new(true, true);
        let deck_file = FakeConverter::new(true, true);
        let exporter = Exporter::new(
            &document,
            &deck_file,
            dir.path().join("out.pdf"),
            dir.path().join("out.pptx"),
        );

        match exporter.export(&deck(), &dir.path().join("out.html"), ExportFormat::DeckFile) {
            Err(Error::Export { format, message }) => {
                assert_eq!(format, ExportFormat::DeckFile);
                assert_eq!(message, "converter crashed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!dir.path().join("out.pptx").exists());
    }
}
