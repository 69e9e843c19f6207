//! State shared by every parser: the package, its relationships, the
//! configuration and the injected capabilities.

use crate::config::ExtractionConfig;
use crate::drawing::{self, DrawingKind};
use crate::error::{Error, Result};
use crate::logging::{LogFacade, Logger};
use crate::ocr::{NoOcr, Ocr};
use crate::package::{Layout, Package, PartIndex, PartKind};
use crate::rels::{owner_of, Relations, RelationshipMap};
use crate::walker::XmlWalker;
use std::io::BufRead;
use std::sync::Arc;

pub(crate) struct Session {
    pub package: Package,
    pub parts: PartIndex,
    pub relations: Relations,
    pub config: ExtractionConfig,
    ocr: Box<dyn Ocr>,
    logger: Arc<dyn Logger>,
    closed: bool,
}

impl Session {
    /// Classify the package and load every relationship part.
    ///
    /// A relationship part that is not well-formed is skipped with a
    /// warning; failing to read one is fatal.
    pub fn open(package: Package, layout: &Layout) -> Result<Self> {
        let mut skipped = Vec::new();
        let parts = package.index(layout, |e| skipped.push(e))?;

        let mut session = Self {
            package,
            parts,
            relations: Relations::default(),
            config: ExtractionConfig::default(),
            ocr: Box::new(NoOcr),
            logger: Arc::new(LogFacade),
            closed: false,
        };
        for err in &skipped {
            session.warn(err);
        }
        session.load_relations()?;
        Ok(session)
    }

    fn load_relations(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .parts
            .all_named(PartKind::Relationships)
            .map(String::from)
            .collect();

        for name in names {
            let Some(owner) = owner_of(&name) else {
                continue;
            };
            match self
                .package
                .with_part(&name, |reader| RelationshipMap::parse(owner, reader))
            {
                Ok(map) => self.relations.add(map),
                Err(err @ Error::Xml(_)) => self.warn(&err),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Report a recoverable problem unless logging is disabled.
    pub fn warn(&self, err: &Error) {
        if !self.config.disable_logging {
            self.logger.warn(err);
        }
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    /// Replace the OCR capability, releasing the previous one.
    pub fn set_ocr(&mut self, ocr: Box<dyn Ocr>) {
        let mut previous = std::mem::replace(&mut self.ocr, ocr);
        if let Err(err) = previous.close() {
            self.warn(&err);
        }
    }

    pub fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    /// Text of the drawing referenced by the start element under `walker`,
    /// or `None` when the element is not a drawing reference, its category
    /// is disabled, or it contributes nothing.
    pub fn drawing_at<R: BufRead>(&self, walker: &XmlWalker<R>, owner: &str) -> Option<String> {
        let kind = DrawingKind::from_element(walker.name())?;
        if !self.config.drawing_enabled(kind) {
            return None;
        }
        let rid = walker.attr(kind.ref_attr());

        match self.drawing(owner, kind, rid.as_deref()) {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                self.warn(&err);
                None
            }
        }
    }

    fn drawing(&self, owner: &str, kind: DrawingKind, rid: Option<&str>) -> Result<String> {
        let rid = rid
            .filter(|id| !id.is_empty())
            .ok_or(Error::MalformedReference(kind.ref_attr()))?;
        let target = self.linked_part(owner, rid, kind.part_kind())?;

        let no_frame = self.config.drawings_no_frame;
        match kind {
            DrawingKind::Chart => self.package.with_part(target, |reader| {
                drawing::chart_text(&mut XmlWalker::new(reader), no_frame)
            }),
            DrawingKind::Diagram => self.package.with_part(target, |reader| {
                drawing::diagram_text(&mut XmlWalker::new(reader), no_frame)
            }),
            DrawingKind::Image => self.package.with_raw_part(target, |reader| {
                let mut image = reader;
                let text = self.ocr.run(&mut image)?;
                Ok(drawing::image_text(&text, no_frame))
            }),
        }
    }

    /// Resolve `rid` of `owner` to a part classified as `kind`.
    pub fn linked_part(&self, owner: &str, rid: &str, kind: PartKind) -> Result<&str> {
        let target = self.relations.resolve(owner, rid)?;
        if !self.parts.contains(kind, target) {
            return Err(Error::unresolved(
                rid,
                format!("{target} is not a known {kind:?} part"),
            ));
        }
        Ok(target)
    }

    /// Release the package and the OCR capability.
    ///
    /// Both are released even if one fails; later calls do nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.package.close();
        self.ocr.close()
    }
}

/// Constructors, configuration mutators, image extraction and `close`,
/// identical for every parser holding a `session` field and providing
/// `fn from_package(Package) -> Result<Self>`.
macro_rules! parser_common {
    ($parser:ident) => {
        impl $parser {
            /// Open a document from a file path.
            pub fn open(path: impl AsRef<std::path::Path>) -> $crate::error::Result<Self> {
                Self::from_package($crate::package::Package::open(path)?)
            }

            /// Open a document held in memory.
            pub fn from_bytes(data: Vec<u8>) -> $crate::error::Result<Self> {
                Self::from_package($crate::package::Package::from_bytes(data)?)
            }

            /// Open a document from a random-access reader of `size` bytes.
            pub fn from_reader<R: std::io::Read + std::io::Seek>(
                reader: R,
                size: u64,
            ) -> $crate::error::Result<Self> {
                Self::from_package($crate::package::Package::from_reader(reader, size)?)
            }

            /// Fetch a document through `fetcher` and open it.
            ///
            /// The fetch status is returned alongside the parser whatever its value.
            pub fn open_fetched<F: $crate::fetch::Fetch + ?Sized>(
                fetcher: &F,
                location: &str,
            ) -> $crate::error::Result<(Self, u16)> {
                let fetched = fetcher.fetch(location)?;
                let parser = Self::from_bytes(fetched.body)?;
                Ok((parser, fetched.status))
            }

            /// Open a document from a file path without blocking the runtime
            /// while the file is read.
            #[cfg(feature = "async")]
            pub async fn open_async(
                path: impl AsRef<std::path::Path>,
            ) -> $crate::error::Result<Self> {
                let data = tokio::fs::read(path.as_ref()).await?;
                Self::from_bytes(data)
            }

            /// Current configuration.
            pub fn config(&self) -> &$crate::config::ExtractionConfig {
                &self.session.config
            }

            /// Mutable access to the configuration.
            pub fn config_mut(&mut self) -> &mut $crate::config::ExtractionConfig {
                &mut self.session.config
            }

            /// Replace the whole configuration.
            pub fn set_config(&mut self, config: $crate::config::ExtractionConfig) {
                self.session.config = config;
            }

            /// Paragraph separator. Default `"\n"`.
            pub fn set_paragraph_sep(&mut self, sep: impl Into<String>) {
                self.session.config.paragraph_sep = sep.into();
            }

            /// Part, slide or sheet separator. Default is 100 dashes and a newline.
            pub fn set_part_sep(&mut self, sep: impl Into<String>) {
                self.session.config.part_sep = sep.into();
            }

            /// Table row separator. Default `"\n"`.
            pub fn set_table_row_sep(&mut self, sep: impl Into<String>) {
                self.session.config.table_row_sep = sep.into();
            }

            /// Table column separator. Default `"\t"`.
            pub fn set_table_col_sep(&mut self, sep: impl Into<String>) {
                self.session.config.table_col_sep = sep.into();
            }

            /// Include chart text. Default off.
            pub fn set_parse_charts(&mut self, on: bool) {
                self.session.config.charts = on;
            }

            /// Include diagram text. Default off.
            pub fn set_parse_diagrams(&mut self, on: bool) {
                self.session.config.diagrams = on;
            }

            /// Run images through the OCR capability. Default off.
            pub fn set_parse_images(&mut self, on: bool) {
                self.session.config.images = on;
            }

            /// Emit drawing text without frames. Default off.
            pub fn set_drawings_no_frame(&mut self, on: bool) {
                self.session.config.drawings_no_frame = on;
            }

            /// Replace the OCR capability.
            pub fn set_ocr(&mut self, ocr: impl $crate::ocr::Ocr + 'static) {
                self.session.set_ocr(Box::new(ocr));
            }

            /// Replace the warning sink.
            pub fn set_logger(&mut self, logger: std::sync::Arc<dyn $crate::logging::Logger>) {
                self.session.set_logger(logger);
            }

            /// Suppress every warning.
            pub fn set_disable_logging(&mut self, on: bool) {
                self.session.config.disable_logging = on;
            }

            /// Decode every embedded raster image.
            pub fn extract_images(
                &self,
            ) -> $crate::error::Result<Vec<$crate::images::ExtractedImage>> {
                self.session.ensure_open()?;
                $crate::images::extract_all(&self.session.package, &self.session.parts)
            }

            /// Release the archive and the OCR capability.
            ///
            /// Safe to call more than once; extraction afterwards fails with
            /// [`Error::Closed`](crate::Error::Closed).
            pub fn close(&mut self) -> $crate::error::Result<()> {
                self.session.close()
            }
        }
    };
}

pub(crate) use parser_common;

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("package", &self.package)
            .field("config", &self.config)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
