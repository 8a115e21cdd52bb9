// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: wraps a decoded raster (a rendered page or an uploaded
// image) and encodes it as PNG bytes or a PNG data URI for thumbnails.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use folio_core::error::{FolioError, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::{debug, instrument};

/// A single in-memory image on its way to an encoded output.
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| FolioError::ImageError(format!("failed to decode image: {err}")))?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    /// Wrap a rendered RGBA page.
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| FolioError::ImageError(format!("PNG encoding failed: {err}")))?;
        Ok(buffer)
    }

    /// Encode the current image as a `data:image/png;base64,...` URI.
    pub fn to_png_data_uri(&self) -> Result<String> {
        let png = self.to_png_bytes()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}
