//! PPTX deck-file reader.
//!
//! Reads back the title and body placeholders of each slide, in
//! presentation order. Used to verify written decks.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidegen_core::{Error, Result, Slide, SlideKind};
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Reader for PPTX (Office Open XML) deck files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide of a PPTX file.
    ///
    /// The slide kind comes from the slide name; slides without one read as
    /// content slides.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<Slide>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Conversion(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        slide_order
            .iter()
            .map(|slide_path| {
                let content = self.read_file_from_archive(&mut archive, slide_path)?;
                parse_slide(&content)
            })
            .collect()
    }

    /// Slide part paths in `p:sldIdLst` order, resolved through the
    /// presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = self.read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut targets = HashMap::new();
        for_each_element(&rels, |e| {
            if local_name(e.name().as_ref()) == b"Relationship" {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
        })?;

        let presentation = self.read_file_from_archive(archive, "ppt/presentation.xml")?;
        let mut ids = Vec::new();
        for_each_element(&presentation, |e| {
            if local_name(e.name().as_ref()) == b"sldId" {
                ids.extend(attribute(e, b"r:id"));
            }
        })?;

        ids.iter()
            .map(|id| {
                targets
                    .get(id)
                    .map(|target| match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    })
                    .ok_or_else(|| {
                        Error::Conversion(format!("Slide relationship '{}' is missing", id))
                    })
            })
            .collect()
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive.by_name(path).map_err(|e| {
            Error::Conversion(format!("File not found in archive '{}': {}", path, e))
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Which slide field a placeholder shape fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Title,
    Body,
}

/// Extract the slide kind and the text of its title and body placeholders.
fn parse_slide(xml_content: &str) -> Result<Slide> {
    let mut slide = Slide::default();
    let mut reader = Reader::from_str(xml_content);

    let mut region: Option<Region> = None;
    let mut shape_text = String::new();
    let mut paragraphs = 0usize;
    let mut in_text_body = false;
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"cSld" => {
                    if let Some(name) = attribute(e, b"name") {
                        slide.kind = SlideKind::from_name(&name);
                    }
                }
                b"sp" => {
                    region = None;
                    shape_text.clear();
                    paragraphs = 0;
                }
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    if paragraphs > 0 {
                        shape_text.push('\n');
                    }
                    paragraphs += 1;
                }
                b"t" if in_text_body => in_run_text = true,
                b"ph" => region = Some(placeholder_region(e)),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"ph" => region = Some(placeholder_region(e)),
                b"cSld" => {
                    if let Some(name) = attribute(e, b"name") {
                        slide.kind = SlideKind::from_name(&name);
                    }
                }
                b"p" if in_text_body => {
                    if paragraphs > 0 {
                        shape_text.push('\n');
                    }
                    paragraphs += 1;
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_run_text {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::Conversion(format!("Bad slide text: {}", e)))?;
                    shape_text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    match region.take() {
                        Some(Region::Title) => slide.title = std::mem::take(&mut shape_text),
                        Some(Region::Body) if slide.body.is_empty() => {
                            slide.body = std::mem::take(&mut shape_text)
                        }
                        _ => shape_text.clear(),
                    }
                    in_text_body = false;
                    in_run_text = false;
                }
                b"txBody" => in_text_body = false,
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Conversion(format!("XML parsing error: {}", e)));
            }
            _ => {}
        }
    }

    Ok(slide)
}

fn placeholder_region(e: &BytesStart<'_>) -> Region {
    match attribute(e, b"type").as_deref() {
        Some("title") | Some("ctrTitle") => Region::Title,
        _ => Region::Body,
    }
}

/// Read an attribute value as unescaped text.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Call `visit` on every start or empty element of `xml`.
fn for_each_element(xml: &str, mut visit: impl FnMut(&BytesStart<'_>)) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => visit(e),
            Ok(Event::Eof) => return Ok(()),
            Err(e) => return Err(Error::Conversion(format!("XML parsing error: {}", e))),
            _ => {}
        }
    }
}

/// Element name without its namespace prefix.
fn local_name(name: &[u8]) -> &[u8] {
    name.rsplit(|&b| b == b':').next().unwrap_or(name)
}
