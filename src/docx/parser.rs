//! DOCX text extraction.

use crate::assembly::{table_text, SectionWriter, TableTags};
use crate::config::ExtractionConfig;
use crate::error::{Error, ExtractError, ExtractResult, Result};
use crate::package::{Layout, Package, PartKind, Slot};
use crate::session::{parser_common, Session};
use crate::walker::{Step, XmlWalker};
use once_cell::sync::Lazy;

static LAYOUT: Lazy<Layout> = Lazy::new(|| {
    Layout::new(&[
        (PartKind::Document, Slot::Single, r"^word/document\.xml$"),
        (PartKind::Comments, Slot::Single, r"^word/comments\.xml$"),
        (PartKind::Endnotes, Slot::Single, r"^word/endnotes\.xml$"),
        (PartKind::Footnotes, Slot::Single, r"^word/footnotes\.xml$"),
        (PartKind::Header, Slot::Numbered, r"^word/header(\d+)\.xml$"),
        (PartKind::Footer, Slot::Numbered, r"^word/footer(\d+)\.xml$"),
        (PartKind::Chart, Slot::Named, r"^word/charts/chart\d+\.xml$"),
        (PartKind::Diagram, Slot::Named, r"^word/diagrams/data\d+\.xml$"),
        (PartKind::Image, Slot::Named, r"^word/media/[^/]+\.(?i:png|gif|jpe?g)$"),
        (PartKind::Relationships, Slot::Named, r"(?:^|/)_rels/[^/]*\.rels$"),
    ])
});

const TABLE: TableTags = TableTags {
    table: "w:tbl",
    row: "w:tr",
    cell: "w:tc",
    text: "w:t",
};

/// Optional parts appended after the body, in output order.
#[derive(Debug, Clone, Copy)]
enum Section {
    Comments,
    Headers,
    Footers,
    Footnotes,
    Endnotes,
}

impl Section {
    const ORDER: [Section; 5] = [
        Section::Comments,
        Section::Headers,
        Section::Footers,
        Section::Footnotes,
        Section::Endnotes,
    ];

    fn enabled(self, config: &ExtractionConfig) -> bool {
        match self {
            Section::Comments => config.comments,
            Section::Headers => config.headers,
            Section::Footers => config.footers,
            Section::Footnotes => config.footnotes,
            Section::Endnotes => config.endnotes,
        }
    }

    fn kind(self) -> PartKind {
        match self {
            Section::Comments => PartKind::Comments,
            Section::Headers => PartKind::Header,
            Section::Footers => PartKind::Footer,
            Section::Footnotes => PartKind::Footnotes,
            Section::Endnotes => PartKind::Endnotes,
        }
    }

    /// Closing tag that ends one line of output.
    fn boundary(self) -> &'static str {
        match self {
            Section::Comments => "w:comment",
            Section::Headers | Section::Footers => "w:p",
            Section::Footnotes => "w:footnote",
            Section::Endnotes => "w:endnote",
        }
    }

    /// Name of the single part backing the section; headers and footers
    /// come in any number.
    fn part_name(self) -> Option<&'static str> {
        match self {
            Section::Comments => Some("word/comments.xml"),
            Section::Footnotes => Some("word/footnotes.xml"),
            Section::Endnotes => Some("word/endnotes.xml"),
            Section::Headers | Section::Footers => None,
        }
    }
}

/// Text extractor for DOCX (Word) documents.
///
/// The body comes first; comments, headers, footers, footnotes and
/// endnotes follow, each preceded by the part separator when not empty.
///
/// ```no_run
/// use oxmltext::docx::DocxParser;
///
/// let mut parser = DocxParser::open("report.docx")?;
/// parser.set_parse_comments(false);
/// parser.set_parse_charts(true);
/// let text = parser.extract_texts().map_err(|e| e.source)?;
/// println!("{text}");
/// parser.close()?;
/// # Ok::<(), oxmltext::Error>(())
/// ```
#[derive(Debug)]
pub struct DocxParser {
    session: Session,
}

parser_common!(DocxParser);

impl DocxParser {
    fn from_package(package: Package) -> Result<Self> {
        Ok(Self {
            session: Session::open(package, &LAYOUT)?,
        })
    }

    /// Include comments. Default on.
    pub fn set_parse_comments(&mut self, on: bool) {
        self.session.config.comments = on;
    }

    /// Include headers. Default on.
    pub fn set_parse_headers(&mut self, on: bool) {
        self.session.config.headers = on;
    }

    /// Include footers. Default on.
    pub fn set_parse_footers(&mut self, on: bool) {
        self.session.config.footers = on;
    }

    /// Include footnotes. Default on.
    pub fn set_parse_footnotes(&mut self, on: bool) {
        self.session.config.footnotes = on;
    }

    /// Include endnotes. Default on.
    pub fn set_parse_endnotes(&mut self, on: bool) {
        self.session.config.endnotes = on;
    }

    /// Extract the body followed by every enabled section.
    pub fn extract_texts(&self) -> ExtractResult {
        self.session.ensure_open()?;
        let config = &self.session.config;

        let body = self.body_text()?;
        let mut out = SectionWriter::with_body(body, &config.part_sep);
        let mut missing = Vec::new();
        let mut failure = None;
        for section in Section::ORDER {
            if !section.enabled(config) {
                continue;
            }
            match self.section_text(section, &mut missing) {
                Ok(text) => out.append(&text),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        // One warning covers every absent optional part.
        if !missing.is_empty() {
            self.session.warn(&Error::PartNotFound(missing.join(", ")));
        }
        match failure {
            Some(err) => Err(ExtractError::new(out.into_string(), err)),
            None => Ok(out.into_string()),
        }
    }

    fn body_text(&self) -> Result<String> {
        let Some(name) = self.session.parts.single(PartKind::Document) else {
            self.session
                .warn(&Error::PartNotFound("word/document.xml".to_string()));
            return Ok(String::new());
        };
        let config = &self.session.config;

        self.session.package.with_part(name, |reader| {
            let mut walker = XmlWalker::new(reader);
            let mut text = String::new();
            let mut paragraph = String::new();
            let mut value = String::new();

            'part: loop {
                match walker.next()? {
                    Step::Start if walker.is("w:t") => {
                        if !walker.assign_next(&mut value)? {
                            break;
                        }
                        paragraph.push_str(&value);
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
                    Step::Start if walker.is("w:drawing") => loop {
                        match walker.next()? {
                            Step::End if walker.is("w:drawing") => break,
                            Step::Start => {
                                if let Some(drawing) = self.session.drawing_at(&walker, name) {
                                    text.push_str(&drawing);
                                }
                            }
                            Step::Eof => break 'part,
                            _ => {}
                        }
                    },
                    Step::End if walker.is("w:p") => {
                        if !paragraph.is_empty() {
                            text.push_str(&paragraph);
                            text.push_str(&config.paragraph_sep);
                            paragraph.clear();
                        }
                    }
                    Step::Eof => break,
                    _ => {}
                }
            }
            Ok(text)
        })
    }

    fn section_text(&self, section: Section, missing: &mut Vec<&'static str>) -> Result<String> {
        let parts = &self.session.parts;
        let names: Vec<&str> = match section.part_name() {
            Some(expected) => match parts.single(section.kind()) {
                Some(name) => vec![name],
                None => {
                    missing.push(expected);
                    return Ok(String::new());
                }
            },
            None => parts
                .all_numbered(section.kind())
                .map(|(_, name)| name)
                .collect(),
        };

        let keep_empty = matches!(section, Section::Comments);
        let mut text = String::new();
        for name in names {
            text.push_str(&self.lines_text(name, section.boundary(), keep_empty)?);
        }
        Ok(text)
    }

    /// Collect `w:t` text, writing a paragraph separator at each closing
    /// `boundary` tag. Empty lines are dropped unless `keep_empty`.
    fn lines_text(&self, name: &str, boundary: &str, keep_empty: bool) -> Result<String> {
        let sep = &self.session.config.paragraph_sep;

        self.session.package.with_part(name, |reader| {
            let mut walker = XmlWalker::new(reader);
            let mut text = String::new();
            let mut line = String::new();
            let mut value = String::new();

            loop {
                match walker.next()? {
                    Step::Start if walker.is("w:t") => {
                        if !walker.assign_next(&mut value)? {
                            break;
                        }
                        line.push_str(&value);
                    }
                    Step::End if walker.is(boundary) => {
                        if keep_empty || !line.is_empty() {
                            text.push_str(&line);
                            text.push_str(sep);
                            line.clear();
                        }
                    }
                    Step::Eof => break,
                    _ => {}
                }
            }
            Ok(text)
        })
    }
}
