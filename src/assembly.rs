//! Joining section output and framing drawing text.

use crate::error::Result;
use crate::walker::{Step, XmlWalker};
use std::io::BufRead;

/// Horizontal line character used by drawing frames.
pub const RULE: &str = "─";

/// Wrap `body` in a box labelled `label`, sized to `max_line_len`.
///
/// Each side of the label gets `(max_line_len - label.len()) / 2` rule
/// characters, floored and clamped at zero, so odd differences leave the
/// box one character narrower than the widest line. `body` is expected to
/// end with a newline.
///
/// ```
/// use oxmltext::assembly::frame;
///
/// let boxed = frame("chart", " [Sales]\n", 8);
/// assert_eq!(boxed, "┌─chart─┐\n [Sales]\n└───────┘\n");
/// ```
pub fn frame(label: &str, body: &str, max_line_len: usize) -> String {
    let half = RULE.repeat(max_line_len.saturating_sub(label.len()) / 2);
    let bottom = RULE.repeat(label.chars().count());

    let mut out = String::with_capacity(body.len() + 4 * half.len() + 32);
    out.push('┌');
    out.push_str(&half);
    out.push_str(label);
    out.push_str(&half);
    out.push_str("┐\n");
    out.push_str(body);
    out.push('└');
    out.push_str(&half);
    out.push_str(&bottom);
    out.push_str(&half);
    out.push_str("┘\n");
    out
}

/// Prefix every line of `text` with `prefix`, returning the new text and
/// the length in bytes of its longest line (prefix included).
pub fn indent_lines(text: &str, prefix: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    let mut max_len = 0;
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i == 0 && text.is_empty() {
            break;
        }
        out.push_str(prefix);
        out.push_str(line);
        max_len = max_len.max(line.len());
    }
    (out, max_len + prefix.len())
}

/// Collects one line at a time and tracks the widest line seen.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pub text: String,
    pub line: String,
    pub max_line_len: usize,
}

impl LineBuffer {
    /// Move the current line into the text with a leading `lead`.
    pub fn flush(&mut self, lead: &str) {
        if self.line.is_empty() {
            return;
        }
        self.text.push_str(lead);
        self.text.push_str(&self.line);
        self.text.push('\n');
        self.max_line_len = self.max_line_len.max(self.line.len());
        self.line.clear();
    }

    /// Finish the drawing: framed unless `no_frame`.
    pub fn finish(self, label: &str, no_frame: bool) -> String {
        if no_frame {
            let mut out = self.text;
            out.push('\n');
            return out;
        }
        frame(label, &self.text, self.max_line_len)
    }
}

/// Concatenates section outputs with a separator, skipping empty ones.
#[derive(Debug)]
pub(crate) struct SectionWriter<'a> {
    out: String,
    sep: &'a str,
}

impl<'a> SectionWriter<'a> {
    pub fn new(sep: &'a str) -> Self {
        Self {
            out: String::new(),
            sep,
        }
    }

    /// Start from the leading section, written as-is.
    pub fn with_body(body: String, sep: &'a str) -> Self {
        Self { out: body, sep }
    }

    /// Append a non-empty section preceded by the separator.
    pub fn append(&mut self, section: &str) {
        if section.is_empty() {
            return;
        }
        self.out.push_str(self.sep);
        self.out.push_str(section);
    }

    /// Append a non-empty section followed by the separator.
    pub fn terminate(&mut self, section: &str) {
        if section.is_empty() {
            return;
        }
        self.out.push_str(section);
        self.out.push_str(self.sep);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

/// Element names of one table vocabulary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableTags {
    pub table: &'static str,
    pub row: &'static str,
    pub cell: &'static str,
    pub text: &'static str,
}

/// Flatten the table whose start tag was just read.
///
/// Every cell contributes its text followed by `col_sep`; every row that
/// produced anything is followed by `row_sep`. Nested tables are folded
/// into the enclosing cell. Returns once the table closes.
pub(crate) fn table_text<R: BufRead>(
    walker: &mut XmlWalker<R>,
    tags: TableTags,
    row_sep: &str,
    col_sep: &str,
) -> Result<String> {
    let mut text = String::new();
    let mut row = String::new();
    let mut cell = String::new();
    let mut value = String::new();
    let mut depth = 0usize;

    loop {
        match walker.next()? {
            Step::Start if walker.is(tags.text) => {
                if !walker.assign_next(&mut value)? {
                    break;
                }
                cell.push_str(&value);
            }
            Step::Start if walker.is(tags.table) => depth += 1,
            Step::End if walker.is(tags.cell) && depth == 0 => {
                row.push_str(&cell);
                row.push_str(col_sep);
                cell.clear();
            }
            Step::End if walker.is(tags.row) && depth == 0 => {
                if !row.is_empty() {
                    text.push_str(&row);
                    text.push_str(row_sep);
                    row.clear();
                }
            }
            Step::End if walker.is(tags.table) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Step::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_TABLE: TableTags = TableTags {
        table: "w:tbl",
        row: "w:tr",
        cell: "w:tc",
        text: "w:t",
    };

    fn table(xml: &str) -> String {
        let mut walker = XmlWalker::new(xml.as_bytes());
        walker.next().unwrap();
        table_text(&mut walker, WORD_TABLE, "\n", "\t").unwrap()
    }

    #[test]
    fn test_table_rows_and_cells() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r><w:r><w:t>b</w:t></w:r></w:p></w:tc>\
                   <w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc></w:tr>\
                   <w:tr><w:tc><w:p><w:r><w:t>d</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/>";
        assert_eq!(table(xml), "ab\tc\t\nd\t\n");
    }

    #[test]
    fn test_empty_table_and_empty_cell() {
        assert_eq!(table("<w:tbl><w:tblPr/></w:tbl>"), "");
        assert_eq!(table("<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"), "\t\n");
        assert_eq!(
            table("<w:tbl><w:tr><w:tc><w:p><w:r><w:t></w:t></w:r></w:p></w:tc></w:tr></w:tbl>"),
            "\t\n"
        );
    }

    #[test]
    fn test_nested_table_stays_in_cell() {
        let xml = "<w:tbl><w:tr><w:tc>\
                   <w:tbl><w:tr><w:tc><w:p><w:r><w:t>in</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
                   </w:tc><w:tc><w:p><w:r><w:t>out</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(table(xml), "in\tout\t\n");
    }

    #[test]
    fn test_frame_image_label() {
        let boxed = frame("image", " hello\n", 5);
        assert_eq!(boxed, "┌image┐\n hello\n└─────┘\n");
    }

    #[test]
    fn test_frame_odd_width_floors() {
        // (12 - 5) / 2 = 3 on each side, one short of the content width.
        let boxed = frame("chart", "x\n", 12);
        let top = boxed.lines().next().unwrap();
        assert_eq!(top, "┌───chart───┐");
        let bottom = boxed.lines().last().unwrap();
        assert_eq!(bottom.chars().count(), top.chars().count());
    }

    #[test]
    fn test_frame_label_longer_than_content() {
        let boxed = frame("diagram", " a\n", 2);
        assert_eq!(boxed, "┌diagram┐\n a\n└───────┘\n");
    }

    #[test]
    fn test_indent_lines() {
        let (text, max) = indent_lines("hello\nhi", " ");
        assert_eq!(text, " hello\n hi");
        assert_eq!(max, 6);

        let (text, max) = indent_lines("", " ");
        assert_eq!(text, "");
        assert_eq!(max, 1);
    }

    #[test]
    fn test_line_buffer() {
        let mut lines = LineBuffer::default();
        lines.line.push_str("1 2 ");
        lines.flush(" ");
        lines.flush(" ");
        assert_eq!(lines.text, " 1 2 \n");
        assert_eq!(lines.max_line_len, 4);
        assert_eq!(lines.finish("chart", true), " 1 2 \n\n");
    }

    #[test]
    fn test_section_writer() {
        let mut leading = SectionWriter::with_body("body\n".to_string(), "--\n");
        leading.append("");
        leading.append("comment\n");
        assert_eq!(leading.into_string(), "body\n--\ncomment\n");

        let mut trailing = SectionWriter::new("==\n");
        trailing.terminate("slide 1\n");
        trailing.terminate("");
        trailing.terminate("slide 3\n");
        assert_eq!(trailing.into_string(), "slide 1\n==\nslide 3\n==\n");
    }
}
