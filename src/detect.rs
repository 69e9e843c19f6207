//! Container format detection.

use crate::error::{Error, Result};
use crate::package::decode_xml_bytes;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound document header used by legacy .doc/.xls/.ppt files.
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Detected document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Word document (.docx)
    Docx,
    /// Excel workbook (.xlsx)
    Xlsx,
    /// PowerPoint presentation (.pptx)
    Pptx,
}

impl FormatType {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Docx => "docx",
            FormatType::Xlsx => "xlsx",
            FormatType::Pptx => "pptx",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Docx => "Word Document",
            FormatType::Xlsx => "Excel Workbook",
            FormatType::Pptx => "PowerPoint Presentation",
        }
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect the format of the file at `path`.
///
/// ```no_run
/// use oxmltext::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("document.docx")?;
/// println!("Detected format: {format}");
/// # Ok::<(), oxmltext::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut head = [0u8; 8];
    let read = read_head(&mut reader, &mut head)?;
    check_magic(&head[..read])?;
    reader.rewind()?;
    detect_format_from_reader(reader)
}

/// Detect the format of an in-memory document.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    check_magic(data)?;
    detect_format_from_reader(std::io::Cursor::new(data))
}

/// Detect the format of a ZIP container from a reader.
///
/// The main content type in `[Content_Types].xml` decides; packages
/// without a recognizable one fall back to their top-level folders.
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<FormatType> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let content_types = match archive.by_name("[Content_Types].xml") {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Some(decode_xml_bytes(&bytes)?)
        }
        Err(_) => None,
    };

    if let Some(types) = content_types {
        if types.contains(DOCX_CONTENT_TYPE) {
            return Ok(FormatType::Docx);
        }
        if types.contains(XLSX_CONTENT_TYPE) {
            return Ok(FormatType::Xlsx);
        }
        if types.contains(PPTX_CONTENT_TYPE) {
            return Ok(FormatType::Pptx);
        }
    }
    detect_by_folder_structure(&archive)
}

fn detect_by_folder_structure<R: Read + Seek>(archive: &zip::ZipArchive<R>) -> Result<FormatType> {
    let has = |prefix: &str| archive.file_names().any(|n| n.starts_with(prefix));

    match (has("word/"), has("xl/"), has("ppt/")) {
        (true, false, false) => Ok(FormatType::Docx),
        (false, true, false) => Ok(FormatType::Xlsx),
        (false, false, true) => Ok(FormatType::Pptx),
        _ => Err(Error::UnknownFormat),
    }
}

fn read_head(reader: &mut impl Read, head: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn check_magic(data: &[u8]) -> Result<()> {
    if is_ole_file(data) {
        return Err(Error::UnsupportedFormat(
            "legacy binary Office document (convert to OOXML first)".to_string(),
        ));
    }
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    Ok(())
}

/// Whether `data` starts with the ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.starts_with(&ZIP_MAGIC)
}

/// Whether `data` starts with the OLE compound document magic bytes.
pub fn is_ole_file(data: &[u8]) -> bool {
    data.starts_with(&OLE_MAGIC)
}
