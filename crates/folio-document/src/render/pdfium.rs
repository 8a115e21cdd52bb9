// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pdfium-backed rasterizer. The native library is bound once per process, on
// first use; later calls reuse the binding (or the recorded bind failure).

use std::sync::OnceLock;

use folio_core::error::{FolioError, Result};
use image::RgbaImage;
use pdfium_render::prelude::{PdfRenderConfig, Pdfium};
use tracing::{debug, info, instrument};

use super::PageRasterizer;

static PDFIUM: OnceLock<std::result::Result<Pdfium, String>> = OnceLock::new();

/// Bind to the pdfium library: next to the executable, then the working
/// directory, then the system library path.
fn pdfium() -> Result<&'static Pdfium> {
    PDFIUM
        .get_or_init(|| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));

            let bindings = exe_dir
                .and_then(|dir| {
                    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)).ok()
                })
                .map(Ok)
                .unwrap_or_else(|| {
                    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                        .or_else(|_| Pdfium::bind_to_system_library())
                })
                .map_err(|err| format!("failed to bind to pdfium: {err}"))?;

            info!("pdfium bound");
            Ok(Pdfium::new(bindings))
        })
        .as_ref()
        .map_err(|err| FolioError::Render(err.clone()))
}

/// Renders real page content through pdfium.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

impl PdfiumRasterizer {
    /// Bind the library now rather than on first render, reporting failure.
    pub fn init() -> Result<Self> {
        pdfium()?;
        Ok(Self)
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn page_count(&self, document: &[u8]) -> Result<usize> {
        let doc = pdfium()?
            .load_pdf_from_byte_slice(document, None)
            .map_err(|err| FolioError::PdfParse(err.to_string()))?;
        Ok(doc.pages().len() as usize)
    }

    #[instrument(skip(self, document), fields(bytes_len = document.len()))]
    fn render_page(&self, document: &[u8], index: usize, scale: f32) -> Result<RgbaImage> {
        let doc = pdfium()?
            .load_pdf_from_byte_slice(document, None)
            .map_err(|err| FolioError::PdfParse(err.to_string()))?;
        let page_index = u16::try_from(index)
            .map_err(|_| FolioError::Render(format!("page {} out of range", index + 1)))?;
        let page = doc
            .pages()
            .get(page_index)
            .map_err(|err| FolioError::Render(format!("page {}: {err}", index + 1)))?;

        let width = (page.width().value * scale).round().max(1.0) as u32;
        let height = (page.height().value * scale).round().max(1.0) as u32;
        super::check_area(width, height)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|err| FolioError::Render(err.to_string()))?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        debug!(page = index + 1, width, height, "Page rendered");
        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| FolioError::Render("bitmap size does not match its dimensions".into()))
    }
}
