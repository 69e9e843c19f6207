//! DOCX (Word) text extraction.
//!
//! Reads the main document body, then comments, headers, footers,
//! footnotes and endnotes from an Office Open XML (.docx) package.

mod parser;

pub use parser::DocxParser;
