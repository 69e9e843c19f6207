//! Forward-only XML cursor shared by every extractor.
//!
//! [`XmlWalker`] wraps a streaming `quick_xml::Reader` and reduces its
//! events to [`Step`]s. The current element's raw tag is kept in a reused
//! buffer so names and attributes can be inspected without allocating per
//! event. Extractors drive it with nested, labelled loops: one loop per
//! structural region, each breaking out when the region's closing tag shows up.

use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// One step of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An element opened; see [`XmlWalker::name`] and [`XmlWalker::attr`].
    Start,
    /// An element closed; see [`XmlWalker::name`].
    End,
    /// A text node that nobody asked to assign.
    Text,
    /// End of the part.
    Eof,
}

/// Pull-based cursor over one part's XML.
pub struct XmlWalker<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    tag: Vec<u8>,
    name_len: usize,
    pending: Option<Step>,
}

impl<R: BufRead> XmlWalker<R> {
    /// Create a walker over `inner`.
    ///
    /// Empty elements are reported as a start followed by an end, and
    /// whitespace inside text is kept as-is.
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = false;
        config.trim_text(false);

        Self {
            reader,
            buf: Vec::with_capacity(1024),
            tag: Vec::with_capacity(128),
            name_len: 0,
            pending: None,
        }
    }

    /// Advance to the next start, end, or text event.
    pub fn next(&mut self) -> Result<Step> {
        if let Some(step) = self.pending.take() {
            return Ok(step);
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    self.name_len = e.name().as_ref().len();
                    self.tag.clear();
                    self.tag.extend_from_slice(&e);
                    return Ok(Step::Start);
                }
                Event::End(e) => {
                    self.tag.clear();
                    self.tag.extend_from_slice(&e);
                    self.name_len = self.tag.len();
                    return Ok(Step::End);
                }
                Event::Text(_) | Event::CData(_) => return Ok(Step::Text),
                Event::Eof => return Ok(Step::Eof),
                _ => {}
            }
        }
    }

    /// Qualified name of the element from the last start or end step.
    pub fn name(&self) -> &[u8] {
        &self.tag[..self.name_len]
    }

    /// Whether the last start or end step was for `name`.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name.as_bytes()
    }

    /// Unescaped value of attribute `key` on the current start element.
    pub fn attr(&self, key: &str) -> Option<String> {
        let content = std::str::from_utf8(&self.tag).ok()?;
        let start = BytesStart::from_content(content, self.name_len);
        start
            .attributes()
            .with_checks(false)
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .map(|a| match a.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
            })
    }

    /// Assign the text that follows into `dest`, then advance past it.
    ///
    /// `dest` is cleared first. Adjacent text and CDATA nodes are joined.
    /// The element event that ends the text is kept for the next call to
    /// [`next`](Self::next). Returns `false` once the part is exhausted.
    pub fn assign_next(&mut self, dest: &mut String) -> Result<bool> {
        dest.clear();
        if let Some(step) = self.pending {
            return Ok(step != Step::Eof);
        }
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(e) => match e.unescape() {
                    Ok(text) => dest.push_str(&text),
                    Err(_) => dest.push_str(&String::from_utf8_lossy(&e)),
                },
                Event::CData(e) => dest.push_str(&String::from_utf8_lossy(&e)),
                Event::Start(e) => {
                    self.name_len = e.name().as_ref().len();
                    self.tag.clear();
                    self.tag.extend_from_slice(&e);
                    self.pending = Some(Step::Start);
                    return Ok(true);
                }
                Event::End(e) => {
                    self.tag.clear();
                    self.tag.extend_from_slice(&e);
                    self.name_len = self.tag.len();
                    self.pending = Some(Step::End);
                    return Ok(true);
                }
                Event::Eof => {
                    self.pending = Some(Step::Eof);
                    return Ok(false);
                }
                _ => {}
            }
        }
    }

    /// Advance to the next start element accepted by `want`.
    ///
    /// Returns `false` when an end element accepted by `stop` is reached
    /// first, or the part ends.
    pub fn seek_start(
        &mut self,
        want: impl Fn(&[u8]) -> bool,
        stop: impl Fn(&[u8]) -> bool,
    ) -> Result<bool> {
        loop {
            match self.next()? {
                Step::Start if want(self.name()) => return Ok(true),
                Step::End if stop(self.name()) => return Ok(false),
                Step::Eof => return Ok(false),
                _ => {}
            }
        }
    }

    /// Advance to the next `<name>` inside the region closed by `</stop>`.
    pub fn find_until(&mut self, name: &str, stop: &str) -> Result<bool> {
        self.seek_start(|n| n == name.as_bytes(), |n| n == stop.as_bytes())
    }

    /// Skip everything up to and including `</name>`.
    pub fn skip_to_end(&mut self, name: &str) -> Result<()> {
        loop {
            match self.next()? {
                Step::End if self.is(name) => return Ok(()),
                Step::Eof => return Ok(()),
                _ => {}
            }
        }
    }
}
