//! Chart, diagram and image text shared by all three document kinds.
//!
//! Chart and diagram parts use the same DrawingML vocabulary whichever
//! package they sit in, so only the way a reference is found differs
//! between formats. Each extractor walks its part once and returns the
//! finished (optionally framed) block of text.

use crate::assembly::{frame, indent_lines, LineBuffer};
use crate::error::Result;
use crate::package::PartKind;
use crate::walker::{Step, XmlWalker};
use std::io::BufRead;

/// The kind of object a drawing reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawingKind {
    /// `c:chart r:id`
    Chart,
    /// `dgm:relIds r:dm`
    Diagram,
    /// `a:blip r:embed`
    Image,
}

impl DrawingKind {
    /// Recognize a referencing element by qualified name.
    pub fn from_element(name: &[u8]) -> Option<Self> {
        match name {
            b"c:chart" => Some(DrawingKind::Chart),
            b"dgm:relIds" => Some(DrawingKind::Diagram),
            b"a:blip" => Some(DrawingKind::Image),
            _ => None,
        }
    }

    /// Attribute holding the relationship id.
    pub fn ref_attr(self) -> &'static str {
        match self {
            DrawingKind::Chart => "r:id",
            DrawingKind::Diagram => "r:dm",
            DrawingKind::Image => "r:embed",
        }
    }

    /// Label centered in the frame.
    pub fn label(self) -> &'static str {
        match self {
            DrawingKind::Chart => "chart",
            DrawingKind::Diagram => "diagram",
            DrawingKind::Image => "image",
        }
    }

    /// Part category the resolved target must belong to.
    pub fn part_kind(self) -> PartKind {
        match self {
            DrawingKind::Chart => PartKind::Chart,
            DrawingKind::Diagram => PartKind::Diagram,
            DrawingKind::Image => PartKind::Image,
        }
    }
}

/// `c:val`, `c:xVal` and `c:yVal`, in any letter case.
fn is_value_list(name: &[u8]) -> bool {
    let Some(local) = name.strip_prefix(b"c:") else {
        return false;
    };
    let tail = match local.len() {
        3 => local,
        4 => &local[1..],
        _ => return false,
    };
    tail.eq_ignore_ascii_case(b"val")
}

/// Render every series of a chart part.
///
/// Per series: the label as ` [name]`, then the category values and each
/// value list as space-joined lines. Output ends when `c:plotArea` closes;
/// a part that never closes it yields nothing.
pub fn chart_text<R: BufRead>(walker: &mut XmlWalker<R>, no_frame: bool) -> Result<String> {
    let mut lines = LineBuffer::default();
    let mut value = String::new();

    'part: loop {
        match walker.next()? {
            Step::End if walker.is("c:plotArea") => {
                return Ok(lines.finish(DrawingKind::Chart.label(), no_frame));
            }
            Step::Start if walker.is("c:ser") => loop {
                match walker.next()? {
                    Step::End if walker.is("c:ser") => break,
                    Step::Start if walker.is("c:tx") => {
                        if walker.find_until("c:v", "c:tx")? {
                            if !walker.assign_next(&mut value)? {
                                break 'part;
                            }
                            lines.line.push_str(" [");
                            lines.line.push_str(&value);
                            lines.line.push(']');
                            lines.flush("");
                        }
                    }
                    Step::Start if walker.is("c:cat") => {
                        while walker.find_until("c:v", "c:cat")? {
                            if !walker.assign_next(&mut value)? {
                                break 'part;
                            }
                            lines.line.push_str(&value);
                            lines.line.push(' ');
                        }
                        lines.flush(" ");
                    }
                    Step::Start if is_value_list(walker.name()) => {
                        let closing = walker.name().to_vec();
                        while walker.seek_start(|n| n == b"c:v", |n| n == closing.as_slice())? {
                            if !walker.assign_next(&mut value)? {
                                break 'part;
                            }
                            lines.line.push_str(&value);
                            lines.line.push(' ');
                        }
                        lines.flush(" ");
                    }
                    Step::Eof => break 'part,
                    _ => {}
                }
            },
            Step::Eof => break,
            _ => {}
        }
    }

    Ok(String::new())
}

/// Render the point list of a diagram data part, one line per paragraph.
pub fn diagram_text<R: BufRead>(walker: &mut XmlWalker<R>, no_frame: bool) -> Result<String> {
    let mut lines = LineBuffer::default();
    let mut value = String::new();

    'part: loop {
        match walker.next()? {
            Step::End if walker.is("dgm:ptLst") => {
                return Ok(lines.finish(DrawingKind::Diagram.label(), no_frame));
            }
            Step::Start if walker.is("a:p") => {
                while walker.find_until("a:t", "a:p")? {
                    if !walker.assign_next(&mut value)? {
                        break 'part;
                    }
                    lines.line.push_str(&value);
                    lines.line.push(' ');
                }
                lines.flush(" ");
            }
            Step::Eof => break,
            _ => {}
        }
    }

    Ok(String::new())
}

/// Format recognized image text. Blank recognition results yield nothing.
pub fn image_text(text: &str, no_frame: bool) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    if no_frame {
        let mut out = text.to_string();
        out.push('\n');
        return out;
    }
    let (mut body, max_line_len) = indent_lines(text, " ");
    body.push('\n');
    frame(DrawingKind::Image.label(), &body, max_line_len)
}
