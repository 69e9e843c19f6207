//! Workbook shared-string table.

use crate::error::Result;
use crate::walker::{Step, XmlWalker};
use std::io::BufRead;

/// Shared strings in ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
    declared: Option<usize>,
}

impl SharedStrings {
    /// Parse a `sharedStrings.xml` part.
    ///
    /// Rich-text runs of one entry are concatenated and phonetic runs are
    /// left out. A `uniqueCount` on the root only sizes the table: entries
    /// past it are dropped, and indices below it that were never parsed
    /// read as empty.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut walker = XmlWalker::new(reader);
        let mut strings = Vec::new();
        let mut declared = None;
        let mut entry = String::new();
        let mut value = String::new();

        loop {
            match walker.next()? {
                Step::Start if walker.is("sst") => {
                    declared = walker
                        .attr("uniqueCount")
                        .and_then(|count| count.trim().parse::<usize>().ok());
                    if let Some(count) = declared {
                        strings.reserve(count.min(1 << 16));
                    }
                }
                Step::Start if walker.is("si") => {
                    let truncated = loop {
                        match walker.next()? {
                            Step::End if walker.is("si") => break false,
                            Step::Start if walker.is("rPh") => walker.skip_to_end("rPh")?,
                            Step::Start if walker.is("t") => {
                                if !walker.assign_next(&mut value)? {
                                    break true;
                                }
                                entry.push_str(&value);
                            }
                            Step::Eof => break true,
                            _ => {}
                        }
                    };
                    strings.push(std::mem::take(&mut entry));
                    if truncated {
                        break;
                    }
                }
                Step::Eof => break,
                _ => {}
            }
        }

        if let Some(count) = declared {
            strings.truncate(count);
        }
        Ok(Self { strings, declared })
    }

    /// Entry at ordinal `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        match self.strings.get(index) {
            Some(entry) => Some(entry.as_str()),
            None if self.declared.is_some_and(|count| index < count) => Some(""),
            None => None,
        }
    }

    /// Resolve a cell token: an in-range ordinal yields its entry, anything
    /// else is the token itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        token
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| self.get(index))
            .unwrap_or(token)
    }

    /// `uniqueCount` from the table root, if present.
    pub fn declared(&self) -> Option<usize> {
        self.declared
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Entries in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
