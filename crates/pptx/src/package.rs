//! OOXML part contents for a minimal presentation package.
//!
//! One slide master, one "Title and Content" layout, one theme. Slides
//! reference the layout through relationship `rId1`.

use quick_xml::escape::escape;
use slidegen_core::Slide;
use std::fmt::Write;

/// Slide width in EMU (16:9).
pub const SLIDE_WIDTH: u64 = 12_192_000;
/// Slide height in EMU.
pub const SLIDE_HEIGHT: u64 = 6_858_000;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_PRESENTATION: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#,
);

const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// Relationship ids in `presentation.xml.rels` before the first slide.
const FIRST_SLIDE_REL: usize = 3;

/// Title placeholder frame: (x, y, cx, cy).
const TITLE_FRAME: (u64, u64, u64, u64) = (838_200, 365_125, 10_515_600, 1_325_563);
/// Body placeholder frame.
const BODY_FRAME: (u64, u64, u64, u64) = (838_200, 1_825_625, 10_515_600, 4_351_338);

/// Path of the `n`th slide part (1-based).
pub fn slide_part(n: usize) -> String {
    format!("ppt/slides/slide{}.xml", n)
}

/// Path of the `n`th slide's relationship part.
pub fn slide_rels_part(n: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", n)
}

/// A single relationship entry.
pub struct Relationship<'a> {
    pub id: String,
    pub rel_type: &'a str,
    pub target: String,
}

impl<'a> Relationship<'a> {
    pub fn new(id: impl Into<String>, rel_type: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

/// Render a relationships part.
pub fn relationships(rels: &[Relationship<'_>]) -> String {
    let mut xml = format!(
        "{}<Relationships xmlns=\"{}\">",
        XML_DECLARATION, NS_RELATIONSHIPS
    );
    for rel in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id, rel.rel_type, rel.target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `[Content_Types].xml` for a package with `slide_count` slides.
pub fn content_types(slide_count: usize) -> String {
    let mut xml = format!(
        concat!(
            "{}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
            r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
            r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
            r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
        ),
        XML_DECLARATION
    );
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            slide_part(n)
        );
    }
    xml.push_str("</Types>");
    xml
}

/// `_rels/.rels`.
pub fn root_relationships() -> String {
    relationships(&[
        Relationship::new("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        Relationship::new("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
        Relationship::new("rId3", REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

/// `ppt/presentation.xml`.
pub fn presentation(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>"#,
        XML_DECLARATION, NS_PRESENTATION
    );
    for n in 0..slide_count {
        let _ = write!(
            xml,
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + n,
            FIRST_SLIDE_REL + n
        );
    }
    let _ = write!(
        xml,
        r#"</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
    );
    xml
}

/// `ppt/_rels/presentation.xml.rels`.
pub fn presentation_relationships(slide_count: usize) -> String {
    let mut rels = vec![
        Relationship::new("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::new("rId2", REL_THEME, "theme/theme1.xml"),
    ];
    for n in 1..=slide_count {
        rels.push(Relationship::new(
            format!("rId{}", FIRST_SLIDE_REL + n - 1),
            REL_SLIDE,
            format!("slides/slide{}.xml", n),
        ));
    }
    relationships(&rels)
}

/// `ppt/slideMasters/slideMaster1.xml`.
pub fn slide_master() -> String {
    format!(
        concat!(
            "{}<p:sldMaster {}><p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>",
            "<p:spTree>{}{}{}</p:spTree></p:cSld>",
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        XML_DECLARATION,
        NS_PRESENTATION,
        group_properties(),
        placeholder_shape(2, "Title Placeholder 1", r#"type="title""#, Some(TITLE_FRAME), ""),
        placeholder_shape(3, "Text Placeholder 2", r#"type="body" idx="1""#, Some(BODY_FRAME), ""),
    )
}

/// `ppt/slideMasters/_rels/slideMaster1.xml.rels`.
pub fn slide_master_relationships() -> String {
    relationships(&[
        Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new("rId2", REL_THEME, "../theme/theme1.xml"),
    ])
}

/// `ppt/slideLayouts/slideLayout1.xml`: title plus one content region.
pub fn slide_layout() -> String {
    format!(
        concat!(
            "{}<p:sldLayout {} type=\"obj\" preserve=\"1\"><p:cSld name=\"Title and Content\">",
            "<p:spTree>{}{}{}</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        XML_DECLARATION,
        NS_PRESENTATION,
        group_properties(),
        placeholder_shape(2, "Title 1", r#"type="title""#, None, ""),
        placeholder_shape(3, "Content Placeholder 2", r#"idx="1""#, None, ""),
    )
}

/// `ppt/slideLayouts/_rels/slideLayout1.xml.rels`.
pub fn slide_layout_relationships() -> String {
    relationships(&[Relationship::new(
        "rId1",
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

/// One slide: the title goes in the title placeholder, the body in the
/// content placeholder. The slide kind is kept as the slide name.
pub fn slide(slide: &Slide) -> String {
    format!(
        concat!(
            "{}<p:sld {}><p:cSld name=\"{}\"><p:spTree>{}{}{}</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
        ),
        XML_DECLARATION,
        NS_PRESENTATION,
        escape(&xml_text(slide.kind.as_str())),
        group_properties(),
        placeholder_shape(2, "Title 1", r#"type="title""#, None, &slide.title),
        placeholder_shape(3, "Content Placeholder 2", r#"idx="1""#, None, &slide.body),
    )
}

/// `ppt/slides/_rels/slideN.xml.rels`.
pub fn slide_relationships() -> String {
    relationships(&[Relationship::new(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )])
}

/// `docProps/core.xml`.
pub fn core_properties(title: &str) -> String {
    format!(
        concat!(
            "{}<cp:coreProperties xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" ",
            "xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:dcterms=\"http://purl.org/dc/terms/\" ",
            "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
            "<dc:title>{}</dc:title><dc:creator>slidegen</dc:creator></cp:coreProperties>"
        ),
        XML_DECLARATION,
        escape(&xml_text(title)),
    )
}

/// `docProps/app.xml`.
pub fn app_properties(slide_count: usize) -> String {
    format!(
        concat!(
            "{}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">",
            "<Application>slidegen</Application><Slides>{}</Slides></Properties>"
        ),
        XML_DECLARATION, slide_count
    )
}

/// `ppt/theme/theme1.xml`.
pub fn theme() -> String {
    const COLORS: [(&str, &str); 10] = [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];

    let mut colors = String::from(concat!(
        r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
        r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    ));
    for (name, rgb) in COLORS {
        let _ = write!(colors, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, rgb);
    }

    let fonts = |latin: &str| {
        format!(
            r#"<a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/>"#,
            latin
        )
    };
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = |w: u32| {
        format!(
            r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr">{}<a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#,
            w, solid
        )
    };
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        concat!(
            "{}<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Office Theme\">",
            "<a:themeElements><a:clrScheme name=\"Office\">{}</a:clrScheme>",
            "<a:fontScheme name=\"Office\"><a:majorFont>{}</a:majorFont><a:minorFont>{}</a:minorFont></a:fontScheme>",
            "<a:fmtScheme name=\"Office\">",
            "<a:fillStyleLst>{}{}{}</a:fillStyleLst>",
            "<a:lnStyleLst>{}{}{}</a:lnStyleLst>",
            "<a:effectStyleLst>{}{}{}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{}{}{}</a:bgFillStyleLst>",
            "</a:fmtScheme></a:themeElements></a:theme>"
        ),
        XML_DECLARATION,
        colors,
        fonts("Calibri Light"),
        fonts("Calibri"),
        solid,
        solid,
        solid,
        line(6350),
        line(12700),
        line(19050),
        effect,
        effect,
        effect,
        solid,
        solid,
        solid,
    )
}

fn group_properties() -> &'static str {
    concat!(
        r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
        r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    )
}

/// A placeholder shape whose text body holds `text`, one paragraph per line.
fn placeholder_shape(
    id: u32,
    name: &str,
    ph_attrs: &str,
    frame: Option<(u64, u64, u64, u64)>,
    text: &str,
) -> String {
    let sp_pr = match frame {
        Some((x, y, cx, cy)) => format!(
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            x, y, cx, cy
        ),
        None => "<p:spPr/>".to_string(),
    };

    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph {}/></p:nvPr></p:nvSpPr>{}<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#
        ),
        id,
        name,
        ph_attrs,
        sp_pr,
        paragraphs(text)
    )
}

fn paragraphs(text: &str) -> String {
    let mut xml = String::new();
    for line in text.split('\n') {
        if line.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
        } else {
            let _ = write!(
                xml,
                r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                escape(&xml_text(line)).replace('\r', "&#13;")
            );
        }
    }
    xml
}

/// Drop characters XML 1.0 cannot represent.
fn xml_text(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
        })
        .collect()
}
