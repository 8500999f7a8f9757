//! PPTX deck-file writer.

use crate::package;
use slidegen_core::{Deck, DeckFileBuilder, Error, Result};
use std::fs;
use std::io::{Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes a deck as a PPTX file, one slide per deck slide.
///
/// Every slide uses the same title-and-content layout regardless of kind.
#[derive(Debug, Clone, Copy)]
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Write the package for `deck` to `writer`, returning it once finished.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = deck.len();
        let title = deck.slides().first().map_or("", |s| s.title.as_str());

        add_part(&mut zip, options, "[Content_Types].xml", &package::content_types(count))?;
        add_part(&mut zip, options, "_rels/.rels", &package::root_relationships())?;
        add_part(&mut zip, options, "docProps/core.xml", &package::core_properties(title))?;
        add_part(&mut zip, options, "docProps/app.xml", &package::app_properties(count))?;
        add_part(&mut zip, options, "ppt/presentation.xml", &package::presentation(count))?;
        add_part(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &package::presentation_relationships(count),
        )?;
        add_part(&mut zip, options, "ppt/theme/theme1.xml", &package::theme())?;
        add_part(
            &mut zip,
            options,
            "ppt/slideMasters/slideMaster1.xml",
            &package::slide_master(),
        )?;
        add_part(
            &mut zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &package::slide_master_relationships(),
        )?;
        add_part(
            &mut zip,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            &package::slide_layout(),
        )?;
        add_part(
            &mut zip,
            options,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &package::slide_layout_relationships(),
        )?;

        for (idx, slide) in deck.slides().iter().enumerate() {
            let n = idx + 1;
            add_part(&mut zip, options, &package::slide_part(n), &package::slide(slide))?;
            add_part(
                &mut zip,
                options,
                &package::slide_rels_part(n),
                &package::slide_relationships(),
            )?;
        }

        zip.finish().map_err(zip_error)
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckFileBuilder for PptxWriter {
    fn is_available(&self) -> bool {
        true
    }

    fn remedy(&self) -> String {
        "rebuild slidegen with the `pptx` feature".to_string()
    }

    /// Writes to a temporary file beside `dest` and renames it into place,
    /// so a failed write never leaves a file at `dest`.
    fn to_deck_file(&self, deck: &Deck, dest: &Path) -> Result<()> {
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        self.write(deck, temp.as_file_mut())?;
        temp.as_file().sync_all()?;
        temp.persist(dest).map_err(|e| Error::IoError(e.error))?;

        log::debug!("Wrote {} slides to {}", deck.len(), dest.display());
        Ok(())
    }
}

fn add_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    zip.start_file(name, options).map_err(zip_error)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::Conversion(format!("ZIP error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PptxReader;
    use slidegen_core::{normalize, Slide, SlideKind};
    use std::fs::File;
    use std::io::Cursor;
    use zip::ZipArchive;

    fn deck() -> Deck {
        Deck::new(vec![
            Slide::new(SlideKind::Title, "Q1 Report", ""),
            Slide::new(SlideKind::TableOfContents, "Agenda", "Revenue\nCosts"),
            Slide::new(SlideKind::Summary, "Thanks & bye", "Questions? <ask>"),
        ])
        .unwrap()
    }

    #[test]
    fn test_package_parts() {
        let cursor = PptxWriter::new().write(&deck(), Cursor::new(Vec::new())).unwrap();
        let archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide3.xml",
            "ppt/slides/_rels/slide3.xml.rels",
        ] {
            assert!(names.contains(&part), "missing part {}", part);
        }
        assert!(!names.contains(&"ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_write_then_read_preserves_slides() {
        let deck = deck();
        let cursor = PptxWriter::new().write(&deck, Cursor::new(Vec::new())).unwrap();
        let slides = PptxReader::new()
            .read(Cursor::new(cursor.into_inner()))
            .unwrap();

        assert_eq!(slides, deck.slides());
    }

    #[test]
    fn test_crlf_body_reads_back_verbatim() {
        let deck = Deck::new(vec![Slide::new(
            SlideKind::Content,
            "Windows notes",
            "first\r\nsecond\r\n\r\nlast",
        )])
        .unwrap();
        let cursor = PptxWriter::new().write(&deck, Cursor::new(Vec::new())).unwrap();

        let slides = PptxReader::new()
            .read(Cursor::new(cursor.into_inner()))
            .unwrap();
        assert_eq!(slides[0].body, "first\r\nsecond\r\n\r\nlast");
    }

    #[test]
    fn test_bare_array_to_deck_file() {
        let raw = r#"[
            {"type": "title", "title": "Kickoff", "body": "Team offsite"},
            {"type": "content", "title": "Plan", "body": "Step 1\nStep 2"},
            {"type": "summary", "title": "Next", "body": "Go"}
        ]"#;
        let deck = normalize(raw).unwrap().deck;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("output.pptx");

        PptxWriter::new().to_deck_file(&deck, &dest).unwrap();

        let slides = PptxReader::new().read(File::open(&dest).unwrap()).unwrap();
        assert_eq!(slides.len(), 3);
        let pairs: Vec<(&str, &str)> = slides
            .iter()
            .map(|s| (s.title.as_str(), s.body.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Kickoff", "Team offsite"),
                ("Plan", "Step 1\nStep 2"),
                ("Next", "Go")
            ]
        );
    }

    #[test]
    fn test_max_deck_keeps_order() {
        let slides = (1..=20)
            .map(|i| Slide::new(SlideKind::Content, format!("Slide {}", i), ""))
            .collect();
        let deck = Deck::new(slides).unwrap();
        let cursor = PptxWriter::new().write(&deck, Cursor::new(Vec::new())).unwrap();

        let read = PptxReader::new()
            .read(Cursor::new(cursor.into_inner()))
            .unwrap();
        let titles: Vec<String> = read.into_iter().map(|s| s.title).collect();
        let expected: Vec<String> = (1..=20).map(|i| format!("Slide {}", i)).collect();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("output.pptx");
        fs::write(&dest, b"stale").unwrap();

        PptxWriter::new().to_deck_file(&deck(), &dest).unwrap();

        let slides = PptxReader::new().read(File::open(&dest).unwrap()).unwrap();
        assert_eq!(slides.len(), 3);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        // The destination is an existing directory, so the final rename fails.
        let dest = dir.path().join("taken");
        fs::create_dir(&dest).unwrap();

        assert!(PptxWriter::new().to_deck_file(&deck(), &dest).is_err());
        assert!(dest.is_dir());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }
}
