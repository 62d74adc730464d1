//! Page inputs for the document pipeline.

use image::DynamicImage;

use crate::core::OcrResult;

/// One page of a source document.
///
/// A page always carries a bitmap. It may also carry native text recovered
/// directly from the source file (e.g. a digitally-authored PDF page), in
/// which case the pipeline skips normalization and recognition for it.
pub struct PageSource {
    /// Rasterized page bitmap.
    pub image: DynamicImage,
    /// Text embedded in the source document, when available.
    pub native_text: Option<String>,
}

impl PageSource {
    /// A scanned page with no embedded text.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            native_text: None,
        }
    }

    /// A page whose text was recovered from the document itself.
    pub fn with_native_text(image: DynamicImage, text: impl Into<String>) -> Self {
        Self {
            image,
            native_text: Some(text.into()),
        }
    }

    /// Returns the native text if it contains anything printable.
    pub fn usable_native_text(&self) -> Option<&str> {
        self.native_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Turns an encoded multi-page document into pipeline pages.
///
/// Implementations own the format-specific work (e.g. PDF rendering) and
/// report per-page native text where the format preserves it.
pub trait PageRasterizer: Send + Sync {
    /// Decodes `bytes` into ordered pages.
    fn rasterize(&self, bytes: &[u8]) -> OcrResult<Vec<PageSource>>;
}
