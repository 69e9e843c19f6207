//! Extraction configuration.

use crate::drawing::DrawingKind;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Separators and inclusion switches read by every extractor.
///
/// Missing fields take their defaults when deserialized, so a partial
/// JSON object such as `{"charts": true}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Written after each paragraph.
    pub paragraph_sep: String,

    /// Between document parts, and after each slide or sheet.
    pub part_sep: String,

    /// Written after each table row.
    pub table_row_sep: String,

    /// Written after each table cell value.
    pub table_col_sep: String,

    /// Written after each text run of a slide.
    pub phrase_sep: String,

    /// Include comments (word-processing).
    pub comments: bool,

    /// Include headers (word-processing).
    pub headers: bool,

    /// Include footers (word-processing).
    pub footers: bool,

    /// Include footnotes (word-processing).
    pub footnotes: bool,

    /// Include endnotes (word-processing).
    pub endnotes: bool,

    /// Include chart series text.
    pub charts: bool,

    /// Include diagram text.
    pub diagrams: bool,

    /// Run embedded images through the OCR capability.
    pub images: bool,

    /// Emit chart, diagram and image text without the surrounding frame.
    pub drawings_no_frame: bool,

    /// Emit only the shared-string table of a workbook.
    pub only_shared_strings: bool,

    /// Suppress every warning.
    pub disable_logging: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            paragraph_sep: "\n".to_string(),
            part_sep: default_part_sep(),
            table_row_sep: "\n".to_string(),
            table_col_sep: "\t".to_string(),
            phrase_sep: " ".to_string(),
            comments: true,
            headers: true,
            footers: true,
            footnotes: true,
            endnotes: true,
            charts: false,
            diagrams: false,
            images: false,
            drawings_no_frame: false,
            only_shared_strings: false,
            disable_logging: false,
        }
    }
}

/// One hundred dashes and a newline.
pub fn default_part_sep() -> String {
    let mut sep = "-".repeat(100);
    sep.push('\n');
    sep
}

impl ExtractionConfig {
    /// Parse a configuration from JSON.
    ///
    /// ```
    /// use oxmltext::ExtractionConfig;
    ///
    /// let config = ExtractionConfig::from_json(r#"{"charts": true, "table_col_sep": ","}"#)?;
    /// assert!(config.charts);
    /// assert_eq!(config.paragraph_sep, "\n");
    /// # Ok::<(), oxmltext::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the paragraph separator.
    pub fn with_paragraph_sep(mut self, sep: impl Into<String>) -> Self {
        self.paragraph_sep = sep.into();
        self
    }

    /// Set the part, slide and sheet separator.
    pub fn with_part_sep(mut self, sep: impl Into<String>) -> Self {
        self.part_sep = sep.into();
        self
    }

    /// Set the table row separator.
    pub fn with_table_row_sep(mut self, sep: impl Into<String>) -> Self {
        self.table_row_sep = sep.into();
        self
    }

    /// Set the table column separator.
    pub fn with_table_col_sep(mut self, sep: impl Into<String>) -> Self {
        self.table_col_sep = sep.into();
        self
    }

    /// Set the phrase separator used for slides.
    pub fn with_phrase_sep(mut self, sep: impl Into<String>) -> Self {
        self.phrase_sep = sep.into();
        self
    }

    /// Toggle charts.
    pub fn with_charts(mut self, on: bool) -> Self {
        self.charts = on;
        self
    }

    /// Toggle diagrams.
    pub fn with_diagrams(mut self, on: bool) -> Self {
        self.diagrams = on;
        self
    }

    /// Toggle image OCR.
    pub fn with_images(mut self, on: bool) -> Self {
        self.images = on;
        self
    }

    /// Toggle drawing frames off (`true`) or on (`false`).
    pub fn with_drawings_no_frame(mut self, on: bool) -> Self {
        self.drawings_no_frame = on;
        self
    }

    /// Toggle every optional word-processing section at once.
    pub fn with_document_parts(mut self, on: bool) -> Self {
        self.comments = on;
        self.headers = on;
        self.footers = on;
        self.footnotes = on;
        self.endnotes = on;
        self
    }

    /// Whether drawings of `kind` are extracted.
    pub fn drawing_enabled(&self, kind: DrawingKind) -> bool {
        match kind {
            DrawingKind::Chart => self.charts,
            DrawingKind::Diagram => self.diagrams,
            DrawingKind::Image => self.images,
        }
    }

    /// Whether any drawing category is enabled.
    pub fn any_drawings(&self) -> bool {
        self.charts || self.diagrams || self.images
    }
}
