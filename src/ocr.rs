//! Pluggable OCR capability for embedded images.

use crate::error::Result;
use std::io::Read;

/// Turns a raw image byte stream into recognized text.
///
/// Implementations wrap an external engine. The session owns its OCR
/// value and calls [`close`](Ocr::close) once when the parser is closed.
pub trait Ocr: Send {
    /// Recognize the text in `image`.
    fn run(&self, image: &mut dyn Read) -> Result<String>;

    /// Release engine resources.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The absent capability: every image yields no text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl Ocr for NoOcr {
    fn run(&self, _image: &mut dyn Read) -> Result<String> {
        Ok(String::new())
    }
}

/// Wraps a closure as an OCR capability.
///
/// ```
/// use oxmltext::ocr::{FnOcr, Ocr};
///
/// let ocr = FnOcr::new(|bytes: &[u8]| Ok(format!("{} bytes", bytes.len())));
/// let text = ocr.run(&mut &b"\x89PNG"[..])?;
/// assert_eq!(text, "4 bytes");
/// # Ok::<(), oxmltext::Error>(())
/// ```
pub struct FnOcr<F> {
    f: F,
}

impl<F> FnOcr<F>
where
    F: Fn(&[u8]) -> Result<String> + Send,
{
    /// Create an OCR capability from `f`, which receives the whole image.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Ocr for FnOcr<F>
where
    F: Fn(&[u8]) -> Result<String> + Send,
{
    fn run(&self, image: &mut dyn Read) -> Result<String> {
        let mut bytes = Vec::new();
        image.read_to_end(&mut bytes)?;
        (self.f)(&bytes)
    }
}
