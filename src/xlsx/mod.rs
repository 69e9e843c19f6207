//! XLSX (Excel) text extraction.
//!
//! # Example
//!
//! ```no_run
//! use oxmltext::xlsx::XlsxParser;
//!
//! let mut parser = XlsxParser::open("spreadsheet.xlsx")?;
//! println!("{} sheets", parser.num_sheets());
//!
//! match parser.extract_texts() {
//!     Ok(text) => println!("{text}"),
//!     Err(e) => eprintln!("stopped after {} bytes: {}", e.partial.len(), e.source),
//! }
//! parser.close()?;
//! # Ok::<(), oxmltext::Error>(())
//! ```

mod parser;
mod shared_strings;

pub use parser::XlsxParser;
pub use shared_strings::SharedStrings;
