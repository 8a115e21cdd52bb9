// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering module: turning document pages into rasters.
//
// `PageRasterizer` is the seam between the toolkit and whatever engine draws
// pages. `FrameRasterizer` needs no native library: it produces a blank
// page-sized canvas with a frame, which is enough for arrangement previews.
// With the `pdfium` feature, `PdfiumRasterizer` renders real page content.

#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod thumbnail;

use folio_core::error::{FolioError, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, instrument};

use crate::pdf::page_tree;

/// Draws document pages into RGBA rasters.
pub trait PageRasterizer: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self, document: &[u8]) -> Result<usize>;

    /// Render the zero-based page `index` at `scale` pixels per point.
    fn render_page(&self, document: &[u8], index: usize, scale: f32) -> Result<RgbaImage>;
}

const FRAME_COLOR: Rgba<u8> = Rgba([200, 200, 200, 255]);
const PAPER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest raster, in pixels, a single page may render to.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Rasterizer that draws only the page outline, sized from the MediaBox and
/// the page's `/Rotate`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameRasterizer;

impl PageRasterizer for FrameRasterizer {
    fn page_count(&self, document: &[u8]) -> Result<usize> {
        Ok(page_tree::load(document)?.get_pages().len())
    }

    #[instrument(skip(self, document), fields(bytes_len = document.len()))]
    fn render_page(&self, document: &[u8], index: usize, scale: f32) -> Result<RgbaImage> {
        let doc = page_tree::load(document)?;
        let ids = page_tree::page_ids(&doc);
        let page_id = *ids.get(index).ok_or_else(|| {
            FolioError::Render(format!("page {} out of range ({} pages)", index + 1, ids.len()))
        })?;

        let [x0, y0, x1, y1] = page_tree::media_box(&doc, page_id);
        let mut width = pixels((x1 - x0).abs(), scale)?;
        let mut height = pixels((y1 - y0).abs(), scale)?;
        check_area(width, height)?;
        if page_tree::rotation(&doc, page_id).rem_euclid(180) == 90 {
            std::mem::swap(&mut width, &mut height);
        }

        let mut canvas = RgbaImage::from_pixel(width, height, PAPER_COLOR);
        draw_hollow_rect_mut(&mut canvas, Rect::at(0, 0).of_size(width, height), FRAME_COLOR);
        debug!(page = index + 1, width, height, "Page frame rendered");
        Ok(canvas)
    }
}

fn pixels(points: f32, scale: f32) -> Result<u32> {
    let value = (f64::from(points) * f64::from(scale)).round().max(1.0);
    if !value.is_finite() || value > f64::from(u32::MAX) {
        return Err(FolioError::Render(format!("page dimension {points}pt at scale {scale} is too large")));
    }
    Ok(value as u32)
}

/// Reject rasters above [`MAX_PIXELS`].
pub(crate) fn check_area(width: u32, height: u32) -> Result<()> {
    match u64::from(width).checked_mul(u64::from(height)) {
        Some(area) if area <= MAX_PIXELS => Ok(()),
        _ => Err(FolioError::Render(format!(
            "page raster {width}x{height} exceeds {MAX_PIXELS} pixels"
        ))),
    }
}
