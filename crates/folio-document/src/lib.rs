// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document: Document processing for the Folio toolkit.
//
// Provides PDF page operations (merge, split, extract, remove, rearrange,
// rotate, compress), content stamping (watermark, page numbers, redaction),
// PDF generation from text and images, page rasterization and thumbnails, and
// the dispatcher that maps a tool invocation onto those operations.

pub mod dispatch;
pub mod image;
pub mod info;
pub mod pdf;
pub mod render;

// Re-export the primary structs so callers can use `folio_document::PdfReader` etc.
pub use dispatch::{Dispatcher, Operation};
pub use crate::image::ImageProcessor;
pub use info::DocumentInfo;
pub use pdf::merge::merge_documents;
pub use pdf::reader::PdfReader;
pub use pdf::stamp::PageStamper;
pub use pdf::writer::PdfWriter;
pub use render::thumbnail::generate_thumbnails;
pub use render::{FrameRasterizer, PageRasterizer};

#[cfg(feature = "pdfium")]
pub use render::pdfium::PdfiumRasterizer;

#[cfg(test)]
pub(crate) mod test_support;
