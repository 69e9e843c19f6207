//! Decoding of embedded raster images.

use crate::error::Result;
use crate::package::{Package, PartIndex, PartKind};
use image::{DynamicImage, ImageFormat};

/// One decoded image from the package's media folder.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    /// Part name inside the package, e.g. `word/media/image1.png`.
    pub name: String,
    /// Format inferred from the image content.
    pub format: ImageFormat,
    /// Decoded pixels.
    pub image: DynamicImage,
}

impl ExtractedImage {
    /// Decode `bytes`, inferring the format from their content.
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self {
            name: name.into(),
            format,
            image,
        })
    }

    /// Lower-case file extension of the detected format.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

/// Decode every image part of the package, in part-name order.
pub(crate) fn extract_all(package: &Package, parts: &PartIndex) -> Result<Vec<ExtractedImage>> {
    parts
        .all_named(PartKind::Image)
        .map(|name| {
            let bytes = package.read_part(name)?;
            ExtractedImage::decode(name, &bytes)
        })
        .collect()
}
