//! PPTX (PowerPoint) text extraction.
//!
//! Slides are read in slide-number order from an Office Open XML (.pptx)
//! package, with charts, diagrams and images resolved through each
//! slide's own relationships.

mod parser;

pub use parser::PptxParser;
