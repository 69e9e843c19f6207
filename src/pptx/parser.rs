//! PPTX text extraction.

use crate::assembly::{table_text, SectionWriter, TableTags};
use crate::error::{Error, ExtractError, ExtractResult, Result};
use crate::package::{Layout, Package, PartKind, Slot};
use crate::session::{parser_common, Session};
use crate::walker::{Step, XmlWalker};
use once_cell::sync::Lazy;

static LAYOUT: Lazy<Layout> = Lazy::new(|| {
    Layout::new(&[
        (PartKind::Slide, Slot::Numbered, r"^ppt/slides/slide(\d+)\.xml$"),
        (PartKind::Chart, Slot::Named, r"^ppt/charts/chart\d+\.xml$"),
        (PartKind::Diagram, Slot::Named, r"^ppt/diagrams/data\d+\.xml$"),
        (PartKind::Image, Slot::Named, r"^ppt/media/[^/]+\.(?i:png|gif|jpe?g)$"),
        (PartKind::Relationships, Slot::Named, r"(?:^|/)_rels/[^/]*\.rels$"),
    ])
});

const TABLE: TableTags = TableTags {
    table: "a:tbl",
    row: "a:tr",
    cell: "a:tc",
    text: "a:t",
};

/// Text extractor for PPTX (PowerPoint) presentations.
///
/// Text runs are joined by the phrase separator and every paragraph ends
/// with the paragraph separator. Each slide with any text is followed by
/// the part separator.
#[derive(Debug)]
pub struct PptxParser {
    session: Session,
}

parser_common!(PptxParser);

impl PptxParser {
    fn from_package(package: Package) -> Result<Self> {
        Ok(Self {
            session: Session::open(package, &LAYOUT)?,
        })
    }

    /// Separator written after each text run. Default `" "`.
    pub fn set_phrase_sep(&mut self, sep: impl Into<String>) {
        self.session.config.phrase_sep = sep.into();
    }

    /// Number of slides.
    pub fn num_slides(&self) -> usize {
        self.session.parts.count_numbered(PartKind::Slide)
    }

    /// Extract the text of every slide, in slide-number order.
    pub fn extract_texts(&self) -> ExtractResult {
        self.session.ensure_open()?;
        let slides: Vec<usize> = self
            .session
            .parts
            .all_numbered(PartKind::Slide)
            .map(|(n, _)| n)
            .collect();
        self.slides_text(&slides)
    }

    /// Extract the text of the given slides (1-based), in the order given.
    pub fn extract_slide_texts(&self, slides: &[usize]) -> ExtractResult {
        self.session.ensure_open()?;
        self.slides_text(slides)
    }

    fn slides_text(&self, slides: &[usize]) -> ExtractResult {
        let mut out = SectionWriter::new(&self.session.config.part_sep);
        for &n in slides {
            match self.slide_text(n) {
                Ok(text) => out.terminate(&text),
                Err(err) => return Err(ExtractError::new(out.into_string(), err)),
            }
        }
        Ok(out.into_string())
    }

    fn slide_text(&self, n: usize) -> Result<String> {
        let name = self
            .session
            .parts
            .numbered(PartKind::Slide, n)
            .ok_or(Error::SlideNotFound(n))?;
        let config = &self.session.config;

        self.session.package.with_part(name, |reader| {
            let mut walker = XmlWalker::new(reader);
            let mut text = String::new();
            let mut phrase = String::new();

            loop {
                match walker.next()? {
                    Step::Start if walker.is("a:t") => {
                        if !walker.assign_next(&mut phrase)? {
                            break;
                        }
                        if !phrase.is_empty() {
                            text.push_str(&phrase);
                            text.push_str(&config.phrase_sep);
                        }
                    }
                    Step::Start if walker.is(TABLE.table) => {
                        let table = table_text(
                            &mut walker,
                            TABLE,
                            &config.table_row_sep,
                            &config.table_col_sep,
                        )?;
                        text.push_str(&table);
                    }
                    Step::Start => {
                        if let Some(drawing) = self.session.drawing_at(&walker, name) {
                            text.push_str(&drawing);
                        }
                    }
                    Step::End if walker.is("a:p") => text.push_str(&config.paragraph_sep),
                    Step::Eof => break,
                    _ => {}
                }
            }
            Ok(text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn presentation(entries: &[(&str, &str)]) -> PptxParser {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        PptxParser::from_bytes(buffer).unwrap()
    }

    fn slide(body: &str) -> String {
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{body}</p:spTree></p:cSld></p:sld>"#
        )
    }

    #[test]
    fn test_phrases_and_paragraphs() {
        let one = slide(
            "<p:sp><p:txBody><a:p><a:r><a:t>Hello</a:t></a:r><a:r><a:t>world</a:t></a:r></a:p>\
             <a:p><a:r><a:t>Bye</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let parser = presentation(&[("ppt/slides/slide1.xml", &one)]);
        assert_eq!(parser.num_slides(), 1);

        let text = parser.extract_texts().unwrap();
        let sep = crate::config::default_part_sep();
        assert_eq!(text, format!("Hello world \nBye \n{sep}"));
    }

    #[test]
    fn test_table_ends_at_its_own_tag() {
        let one = slide(
            "<p:graphicFrame><a:graphic><a:graphicData><a:tbl>\
             <a:tr><a:tc><a:txBody><a:p><a:r><a:t>x</a:t></a:r></a:p></a:txBody></a:tc>\
             <a:tc><a:txBody><a:p><a:r><a:t>y</a:t></a:r></a:p></a:txBody></a:tc></a:tr>\
             </a:tbl></a:graphicData></a:graphic></p:graphicFrame>\
             <p:sp><p:txBody><a:p><a:r><a:t>after</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let mut parser = presentation(&[("ppt/slides/slide1.xml", &one)]);
        parser.set_part_sep("");
        assert_eq!(parser.extract_texts().unwrap(), "x\ty\t\nafter \n");
    }

    #[test]
    fn test_empty_slide_is_skipped() {
        let mut parser = presentation(&[
            ("ppt/slides/slide1.xml", &slide("")),
            ("ppt/slides/slide2.xml", &slide("<a:p><a:r><a:t>two</a:t></a:r></a:p>")),
        ]);
        parser.set_part_sep("--\n");
        parser.set_phrase_sep("");
        assert_eq!(parser.extract_texts().unwrap(), "two\n--\n");
    }

    #[test]
    fn test_missing_slide() {
        let parser = presentation(&[(
            "ppt/slides/slide1.xml",
            &slide("<a:p><a:r><a:t>one</a:t></a:r></a:p>"),
        )]);
        let err = parser.extract_slide_texts(&[1, 3]).unwrap_err();
        assert!(matches!(err.source, Error::SlideNotFound(3)));
        assert!(err.partial.starts_with("one \n"));
    }
}
