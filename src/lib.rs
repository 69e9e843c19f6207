//! # oxmltext
//!
//! Plain-text extraction from Office Open XML documents.
//!
//! DOCX, XLSX and PPTX packages are streamed part by part: body text,
//! tables, comments, headers, footers and notes, slide phrases and sheet
//! cells are flattened with configurable separators. Charts, diagrams and
//! images (through a pluggable OCR capability) can be included as framed
//! blocks of text.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Auto-detect the format and use default settings.
//! let text = oxmltext::extract_text("report.docx")?;
//! println!("{text}");
//! # Ok::<(), oxmltext::Error>(())
//! ```
//!
//! ## Format-Specific APIs
//!
//! ```no_run
//! use oxmltext::docx::DocxParser;
//! use oxmltext::pptx::PptxParser;
//! use oxmltext::xlsx::XlsxParser;
//!
//! let mut doc = DocxParser::open("report.docx")?;
//! doc.set_parse_charts(true);
//! let body = doc.extract_texts().map_err(|e| e.source)?;
//! doc.close()?;
//!
//! let slides = PptxParser::open("slides.pptx")?;
//! let first = slides.extract_slide_texts(&[1]).map_err(|e| e.source)?;
//!
//! let mut workbook = XlsxParser::open("data.xlsx")?;
//! workbook.set_table_col_sep(",");
//! let cells = workbook.extract_texts().map_err(|e| e.source)?;
//! # Ok::<(), oxmltext::Error>(())
//! ```
//!
//! ## Features
//!
//! - `docx` (default): Word document support
//! - `xlsx` (default): Excel spreadsheet support
//! - `pptx` (default): PowerPoint presentation support
//! - `async`: `open_async` constructors reading files with Tokio

pub mod assembly;
pub mod config;
pub mod detect;
pub mod drawing;
pub mod error;
pub mod fetch;
pub mod images;
pub mod logging;
pub mod ocr;
pub mod package;
pub mod rels;
mod session;
pub mod walker;

#[cfg(feature = "docx")]
pub mod docx;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "pptx")]
pub mod pptx;

// Re-exports
pub use config::ExtractionConfig;
pub use detect::{detect_format_from_bytes, detect_format_from_path, FormatType};
pub use error::{Error, ExtractError, ExtractResult, Result};
pub use fetch::{Fetch, Fetched};
pub use images::ExtractedImage;
pub use logging::{LogFacade, Logger, MemoryLogger, NullLogger};
pub use ocr::{FnOcr, NoOcr, Ocr};

use std::path::Path;

/// Extract all text from a document file with default settings.
///
/// The format is detected from the file content.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;

    match format {
        #[cfg(feature = "docx")]
        FormatType::Docx => {
            let mut parser = docx::DocxParser::open(path)?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(feature = "xlsx")]
        FormatType::Xlsx => {
            let mut parser = xlsx::XlsxParser::open(path)?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(feature = "pptx")]
        FormatType::Pptx => {
            let mut parser = pptx::PptxParser::open(path)?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(not(all(feature = "docx", feature = "xlsx", feature = "pptx")))]
        _ => Err(Error::UnsupportedFormat(format!("{:?}", format))),
    }
}

/// Extract all text from an in-memory document with default settings.
///
/// ```no_run
/// let data = std::fs::read("slides.pptx")?;
/// let text = oxmltext::extract_text_from_bytes(&data)?;
/// # Ok::<(), oxmltext::Error>(())
/// ```
pub fn extract_text_from_bytes(data: &[u8]) -> Result<String> {
    let format = detect_format_from_bytes(data)?;

    match format {
        #[cfg(feature = "docx")]
        FormatType::Docx => {
            let mut parser = docx::DocxParser::from_bytes(data.to_vec())?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(feature = "xlsx")]
        FormatType::Xlsx => {
            let mut parser = xlsx::XlsxParser::from_bytes(data.to_vec())?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(feature = "pptx")]
        FormatType::Pptx => {
            let mut parser = pptx::PptxParser::from_bytes(data.to_vec())?;
            let text = parser.extract_texts();
            finish(text, parser.close())
        }
        #[cfg(not(all(feature = "docx", feature = "xlsx", feature = "pptx")))]
        _ => Err(Error::UnsupportedFormat(format!("{:?}", format))),
    }
}

/// Prefer the extraction failure over a close failure.
#[cfg(any(feature = "docx", feature = "xlsx", feature = "pptx"))]
fn finish(text: ExtractResult, closed: Result<()>) -> Result<String> {
    let text = text.map_err(|e| e.source)?;
    closed?;
    Ok(text)
}
