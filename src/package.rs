//! ZIP package access and part classification for OOXML documents.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

/// The archive type shared by every part reader.
///
/// Cloning is cheap: the bytes and the central directory are both
/// reference counted, so several parts can be streamed at once.
type Archive = zip::ZipArchive<Cursor<Arc<[u8]>>>;

/// Category a part is classified into when the package is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartKind {
    /// Main body of a word-processing document.
    Document,
    /// Comments part.
    Comments,
    /// Endnotes part.
    Endnotes,
    /// Footnotes part.
    Footnotes,
    /// Numbered header part.
    Header,
    /// Numbered footer part.
    Footer,
    /// Relationship descriptor (`*.rels`).
    Relationships,
    /// Chart part.
    Chart,
    /// Raster image in the media folder.
    Image,
    /// Diagram data part.
    Diagram,
    /// Spreadsheet drawing part.
    Drawing,
    /// Numbered worksheet.
    Sheet,
    /// Numbered presentation slide.
    Slide,
    /// Spreadsheet shared-string table.
    SharedStrings,
}

/// How a classified part is stored in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// At most one part of the kind.
    Single,
    /// Parts keyed by the number captured from their name.
    Numbered,
    /// Parts looked up by full name.
    Named,
}

/// A set of name patterns describing one document kind.
#[derive(Debug)]
pub struct Layout {
    rules: Vec<(PartKind, Slot, Regex)>,
}

impl Layout {
    /// Build a layout from `(kind, slot, pattern)` rules.
    ///
    /// Numbered patterns must capture the part number in group 1.
    pub fn new(rules: &[(PartKind, Slot, &str)]) -> Self {
        let rules = rules
            .iter()
            .map(|(kind, slot, pattern)| {
                let re = Regex::new(pattern).expect("part pattern is a valid regex");
                (*kind, *slot, re)
            })
            .collect();
        Self { rules }
    }

    /// Classify one entry name, returning the kind, slot and captured number.
    pub fn classify(&self, name: &str) -> Option<Result<(PartKind, Slot, usize)>> {
        for (kind, slot, re) in &self.rules {
            let Some(caps) = re.captures(name) else {
                continue;
            };
            if *slot != Slot::Numbered {
                return Some(Ok((*kind, *slot, 0)));
            }
            let number = caps
                .get(1)
                .ok_or_else(|| Error::PartNotFound(format!("{name}: no part number")))
                .and_then(|m| {
                    m.as_str()
                        .parse::<usize>()
                        .map_err(|e| Error::PartNotFound(format!("{name}: {e}")))
                });
            return Some(number.map(|n| (*kind, *slot, n)));
        }
        None
    }
}

/// Typed slots of every classified part in a package.
#[derive(Debug, Default, Clone)]
pub struct PartIndex {
    single: HashMap<PartKind, String>,
    numbered: HashMap<PartKind, BTreeMap<usize, String>>,
    named: HashMap<PartKind, BTreeSet<String>>,
}

impl PartIndex {
    /// Classify every name against `layout`.
    ///
    /// Names whose number cannot be parsed are reported through `skipped`.
    pub fn build<'a>(
        names: impl IntoIterator<Item = &'a str>,
        layout: &Layout,
        mut skipped: impl FnMut(Error),
    ) -> Self {
        let mut index = Self::default();
        for name in names {
            match layout.classify(name) {
                Some(Ok((kind, Slot::Single, _))) => {
                    index.single.insert(kind, name.to_string());
                }
                Some(Ok((kind, Slot::Numbered, n))) => {
                    index
                        .numbered
                        .entry(kind)
                        .or_default()
                        .insert(n, name.to_string());
                }
                Some(Ok((kind, Slot::Named, _))) => {
                    index.named.entry(kind).or_default().insert(name.to_string());
                }
                Some(Err(e)) => skipped(e),
                None => {}
            }
        }
        index
    }

    /// The single part of `kind`, if present.
    pub fn single(&self, kind: PartKind) -> Option<&str> {
        self.single.get(&kind).map(String::as_str)
    }

    /// The part of `kind` carrying number `n`.
    pub fn numbered(&self, kind: PartKind, n: usize) -> Option<&str> {
        self.numbered
            .get(&kind)
            .and_then(|parts| parts.get(&n))
            .map(String::as_str)
    }

    /// All numbered parts of `kind`, in ascending number order.
    pub fn all_numbered(&self, kind: PartKind) -> impl Iterator<Item = (usize, &str)> {
        self.numbered
            .get(&kind)
            .into_iter()
            .flat_map(|parts| parts.iter().map(|(n, name)| (*n, name.as_str())))
    }

    /// Number of parts of `kind` in the numbered slot.
    pub fn count_numbered(&self, kind: PartKind) -> usize {
        self.numbered.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Whether `name` was classified as a named part of `kind`.
    pub fn contains(&self, kind: PartKind, name: &str) -> bool {
        self.named
            .get(&kind)
            .is_some_and(|parts| parts.contains(name))
    }

    /// All named parts of `kind`, sorted by name.
    pub fn all_named(&self, kind: PartKind) -> impl Iterator<Item = &str> {
        self.named
            .get(&kind)
            .into_iter()
            .flat_map(|parts| parts.iter().map(String::as_str))
    }
}

/// An opened OOXML package.
pub struct Package {
    archive: Option<Archive>,
}

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

impl Package {
    /// Open a package from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package from an in-memory buffer.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data.into()))?;
        log::debug!(target: "oxmltext", "opened package with {} entries", archive.len());
        Ok(Self {
            archive: Some(archive),
        })
    }

    /// Open a package from a random-access reader holding `size` bytes.
    ///
    /// `size` never exceeds what the stream actually holds.
    pub fn from_reader<R: Read + Seek>(mut reader: R, size: u64) -> Result<Self> {
        let available = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        let size = size.min(available);
        let mut data = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
        reader.take(size).read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    fn archive(&self) -> Result<&Archive> {
        self.archive.as_ref().ok_or(Error::Closed)
    }

    /// Names of every entry in the package.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.archive()?.file_names().map(String::from).collect())
    }

    /// Classify every entry against `layout`.
    pub fn index(&self, layout: &Layout, skipped: impl FnMut(Error)) -> Result<PartIndex> {
        let archive = self.archive()?;
        Ok(PartIndex::build(archive.file_names(), layout, skipped))
    }

    /// Stream the bytes of part `name` through `f`, unchanged.
    pub fn with_raw_part<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut dyn BufRead) -> Result<T>,
    ) -> Result<T> {
        let mut archive = self.archive()?.clone();
        let entry = archive.by_name(name).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => Error::PartNotFound(name.to_string()),
            other => other.into(),
        })?;
        let out = f(&mut BufReader::new(entry));
        out
    }

    /// Stream the XML part `name` through `f`.
    ///
    /// UTF-16 parts are transcoded to UTF-8 first; a UTF-8 BOM is skipped.
    pub fn with_part<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut dyn BufRead) -> Result<T>,
    ) -> Result<T> {
        self.with_raw_part(name, |reader| {
            let head = reader.fill_buf()?;
            let utf16 = head.starts_with(&[0xFF, 0xFE]) || head.starts_with(&[0xFE, 0xFF]);
            let utf8_bom = head.starts_with(&UTF8_BOM);

            if utf16 {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                let xml = decode_xml_bytes(&bytes)?;
                return f(&mut Cursor::new(xml.as_bytes()));
            }
            if utf8_bom {
                reader.consume(UTF8_BOM.len());
            }
            f(reader)
        })
    }

    /// Read a whole part into memory, unchanged.
    pub fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        self.with_raw_part(name, |reader| {
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            Ok(data)
        })
    }

    /// Release the archive. Later reads fail with [`Error::Closed`].
    pub fn close(&mut self) {
        self.archive = None;
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.archive.is_none()
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("entries", &self.archive.as_ref().map(|a| a.len()))
            .finish()
    }
}

/// Decode XML bytes to a UTF-8 string, handling UTF-16 LE/BE and BOMs.
///
/// The XML declaration is rewritten to say UTF-8 once transcoded.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes).map(|s| declare_utf8(&s));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes).map(|s| declare_utf8(&s));
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn declare_utf8(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    let Some(end) = content.find("?>") else {
        return content.to_string();
    };
    let (decl, rest) = content.split_at(end);
    let mut fixed = decl.to_string();
    for quoted in ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"] {
        fixed = fixed.replace(quoted, "\"UTF-8\"");
    }
    fixed + rest
}
