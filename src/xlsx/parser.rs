//! XLSX text extraction.

use super::shared_strings::SharedStrings;
use crate::assembly::SectionWriter;
use crate::error::{Error, ExtractError, ExtractResult, Result};
use crate::package::{Layout, Package, PartKind, Slot};
use crate::session::{parser_common, Session};
use crate::walker::{Step, XmlWalker};
use once_cell::sync::Lazy;

static LAYOUT: Lazy<Layout> = Lazy::new(|| {
    Layout::new(&[
        (PartKind::SharedStrings, Slot::Single, r"^xl/sharedStrings\.xml$"),
        (PartKind::Sheet, Slot::Numbered, r"^xl/worksheets/sheet(\d+)\.xml$"),
        (PartKind::Drawing, Slot::Named, r"^xl/drawings/drawing\d+\.xml$"),
        (PartKind::Chart, Slot::Named, r"^xl/charts/chart\d+\.xml$"),
        (PartKind::Diagram, Slot::Named, r"^xl/diagrams/data\d+\.xml$"),
        (PartKind::Image, Slot::Named, r"^xl/media/[^/]+\.(?i:png|gif|jpe?g)$"),
        (PartKind::Relationships, Slot::Named, r"(?:^|/)_rels/[^/]*\.rels$"),
    ])
});

/// Text extractor for XLSX (Excel) workbooks.
///
/// Each worksheet becomes one block: cell values followed by the column
/// separator, rows ended by the row separator. Blocks are each followed
/// by the part separator.
///
/// ```no_run
/// use oxmltext::xlsx::XlsxParser;
///
/// let mut parser = XlsxParser::open("data.xlsx")?;
/// parser.set_table_col_sep(",");
/// let text = parser.extract_sheet_texts(&[1]).map_err(|e| e.source)?;
/// parser.close()?;
/// # Ok::<(), oxmltext::Error>(())
/// ```
#[derive(Debug)]
pub struct XlsxParser {
    session: Session,
    shared: Option<SharedStrings>,
}

parser_common!(XlsxParser);

impl XlsxParser {
    fn from_package(package: Package) -> Result<Self> {
        Ok(Self {
            session: Session::open(package, &LAYOUT)?,
            shared: None,
        })
    }

    /// Emit only the shared-string table from [`extract_texts`](Self::extract_texts).
    pub fn set_only_shared_strings(&mut self, on: bool) {
        self.session.config.only_shared_strings = on;
    }

    /// Number of worksheets.
    pub fn num_sheets(&self) -> usize {
        self.session.parts.count_numbered(PartKind::Sheet)
    }

    /// Load the shared-string table. Later calls do nothing.
    ///
    /// A workbook without one reads every cell value literally.
    pub fn parse_shared_strings(&mut self) -> Result<()> {
        if self.shared.is_some() {
            return Ok(());
        }
        self.session.ensure_open()?;
        let table = match self.session.parts.single(PartKind::SharedStrings) {
            Some(name) => self
                .session
                .package
                .with_part(name, |reader| SharedStrings::parse(reader))?,
            None => SharedStrings::default(),
        };
        self.shared = Some(table);
        Ok(())
    }

    /// The shared-string table, once parsed.
    pub fn shared_strings(&self) -> Option<&SharedStrings> {
        self.shared.as_ref()
    }

    /// Extract the text of every sheet, in sheet-number order.
    pub fn extract_texts(&mut self) -> ExtractResult {
        self.parse_shared_strings()?;

        if self.session.config.only_shared_strings {
            let sep = &self.session.config.table_row_sep;
            let mut out = String::new();
            for value in self.shared.iter().flat_map(|table| table.iter()) {
                out.push_str(value);
                out.push_str(sep);
            }
            return Ok(out);
        }

        let sheets: Vec<usize> = self
            .session
            .parts
            .all_numbered(PartKind::Sheet)
            .map(|(n, _)| n)
            .collect();
        self.sheets_text(&sheets)
    }

    /// Extract the text of the given sheets (1-based), in the order given.
    pub fn extract_sheet_texts(&mut self, sheets: &[usize]) -> ExtractResult {
        self.parse_shared_strings()?;
        self.sheets_text(sheets)
    }

    fn sheets_text(&self, sheets: &[usize]) -> ExtractResult {
        let mut out = SectionWriter::new(&self.session.config.part_sep);
        for &n in sheets {
            match self.sheet_text(n) {
                Ok(text) => out.terminate(&text),
                Err(err) => return Err(ExtractError::new(out.into_string(), err)),
            }
        }
        Ok(out.into_string())
    }

    fn sheet_text(&self, n: usize) -> Result<String> {
        let name = self
            .session
            .parts
            .numbered(PartKind::Sheet, n)
            .ok_or(Error::SheetNotFound(n))?;
        let config = &self.session.config;
        let empty = SharedStrings::default();
        let shared = self.shared.as_ref().unwrap_or(&empty);

        self.session.package.with_part(name, |reader| {
            let mut walker = XmlWalker::new(reader);
            let mut text = String::new();
            let mut value = String::new();
            let mut cell_type: Option<String> = None;

            'part: loop {
                match walker.next()? {
                    Step::Start if walker.is("c") => cell_type = walker.attr("t"),
                    Step::Start if walker.is("v") => {
                        if !walker.assign_next(&mut value)? {
                            break;
                        }
                        match cell_type.as_deref() {
                            Some("s") => text.push_str(shared.resolve(&value)),
                            _ => text.push_str(&value),
                        }
                        text.push_str(&config.table_col_sep);
                    }
                    Step::Start if walker.is("is") => {
                        let mut inline = String::new();
                        loop {
                            match walker.next()? {
                                Step::End if walker.is("is") => break,
                                Step::Start if walker.is("rPh") => walker.skip_to_end("rPh")?,
                                Step::Start if walker.is("t") => {
                                    if !walker.assign_next(&mut value)? {
                                        break 'part;
                                    }
                                    inline.push_str(&value);
                                }
                                Step::Eof => break 'part,
                                _ => {}
                            }
                        }
                        text.push_str(&inline);
                        text.push_str(&config.table_col_sep);
                    }
                    Step::Start if walker.is("drawing") && config.any_drawings() => {
                        let rid = walker.attr("r:id");
                        match self.sheet_drawings(name, rid.as_deref()) {
                            Ok(drawings) => text.push_str(&drawings),
                            Err(err) => self.session.warn(&err),
                        }
                    }
                    Step::End if walker.is("row") => text.push_str(&config.table_row_sep),
                    Step::Eof => break,
                    _ => {}
                }
            }
            Ok(text)
        })
    }

    /// Follow a sheet's drawing reference to its drawing part, then each
    /// chart, diagram or image that part references through its own
    /// relationships.
    fn sheet_drawings(&self, sheet: &str, rid: Option<&str>) -> Result<String> {
        let rid = rid
            .filter(|id| !id.is_empty())
            .ok_or(Error::MalformedReference("r:id"))?;
        let drawing = self.session.linked_part(sheet, rid, PartKind::Drawing)?;

        self.session.package.with_part(drawing, |reader| {
            let mut walker = XmlWalker::new(reader);
            let mut text = String::new();
            loop {
                match walker.next()? {
                    Step::Start => {
                        if let Some(found) = self.session.drawing_at(&walker, drawing) {
                            text.push_str(&found);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use std::io::{Cursor, Write};
    use std::sync::Arc;
    use zip::write::SimpleFileOptions;

    fn workbook(entries: &[(&str, &str)]) -> XlsxParser {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            for (name, body) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        XlsxParser::from_bytes(buffer).unwrap()
    }

    const SST: &str = r#"<sst count="2" uniqueCount="2"><si><t>Name</t></si><si><t>Alice</t></si></sst>"#;

    const SHEET: &str = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>42</v></c></row>
<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2" t="inlineStr"><is><t>inline</t></is></c></row>
</sheetData></worksheet>"#;

    #[test]
    fn test_shared_string_cells() {
        let mut parser = workbook(&[
            ("xl/sharedStrings.xml", SST),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let sep = "==\n";
        parser.set_part_sep(sep);

        let text = parser.extract_texts().unwrap();
        assert_eq!(text, "Name\t42\t\nAlice\tinline\t\n==\n");
    }

    #[test]
    fn test_numeric_cell_is_literal() {
        // "1" is a number here, not a shared-string index.
        let sheet = r#"<worksheet><sheetData><row><c><v>1</v></c></row></sheetData></worksheet>"#;
        let mut parser = workbook(&[
            ("xl/sharedStrings.xml", SST),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        parser.set_part_sep("");
        assert_eq!(parser.extract_texts().unwrap(), "1\t\n");
    }

    #[test]
    fn test_only_shared_strings() {
        let mut parser = workbook(&[
            ("xl/sharedStrings.xml", SST),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        parser.set_only_shared_strings(true);
        parser.set_table_row_sep("|");
        assert_eq!(parser.extract_texts().unwrap(), "Name|Alice|");
    }

    #[test]
    fn test_parse_shared_strings_is_idempotent() {
        let mut parser = workbook(&[("xl/sharedStrings.xml", SST)]);
        parser.parse_shared_strings().unwrap();
        let first = parser.shared_strings().cloned();
        parser.parse_shared_strings().unwrap();
        assert_eq!(parser.shared_strings().cloned(), first);
        assert_eq!(first.map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_missing_sheet_keeps_partial_text() {
        let mut parser = workbook(&[("xl/worksheets/sheet1.xml", SHEET)]);
        parser.set_part_sep("#\n");
        let err = parser.extract_sheet_texts(&[1, 5]).unwrap_err();
        assert!(matches!(err.source, Error::SheetNotFound(5)));
        assert_eq!(err.partial, "0\t42\t\n1\tinline\t\n#\n");
    }

    #[test]
    fn test_sheet_order_and_count() {
        let one = r#"<worksheet><sheetData><row><c><v>one</v></c></row></sheetData></worksheet>"#;
        let two = r#"<worksheet><sheetData><row><c><v>two</v></c></row></sheetData></worksheet>"#;
        let mut parser = workbook(&[
            ("xl/worksheets/sheet2.xml", two),
            ("xl/worksheets/sheet1.xml", one),
        ]);
        parser.set_part_sep("/");
        assert_eq!(parser.num_sheets(), 2);
        assert_eq!(parser.extract_texts().unwrap(), "one\t\n/two\t\n/");
        assert_eq!(parser.extract_sheet_texts(&[2]).unwrap(), "two\t\n/");
    }

    #[test]
    fn test_unresolved_sheet_drawing_warns() {
        let sheet = r#"<worksheet><sheetData><row><c><v>x</v></c></row></sheetData><drawing r:id="rId9"/></worksheet>"#;
        let mut parser = workbook(&[("xl/worksheets/sheet1.xml", sheet)]);
        let logger = MemoryLogger::new();
        parser.set_logger(Arc::new(logger.clone()));
        parser.set_part_sep("");

        assert_eq!(parser.extract_texts().unwrap(), "x\t\n");
        assert!(logger.is_empty());

        parser.set_parse_charts(true);
        assert_eq!(parser.extract_texts().unwrap(), "x\t\n");
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_closed_parser() {
        let mut parser = workbook(&[("xl/worksheets/sheet1.xml", SHEET)]);
        parser.close().unwrap();
        parser.close().unwrap();
        let err = parser.extract_texts().unwrap_err();
        assert!(matches!(err.source, Error::Closed));
    }
}
