// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operation dispatcher: maps one tool invocation (inputs plus parameters)
// onto the document operations and packages the output buffers.

use std::sync::Arc;

use folio_core::error::{FolioError, Result};
use folio_core::{
    OperationResult, PageIntent, Rotation, ToolConfig, ToolId, UploadFile, resolve_pages,
};
use tracing::{info, instrument, warn};

use crate::pdf::merge::{merge_documents, overlay_documents};
use crate::pdf::{PdfReader, PdfWriter};
use crate::pdf::stamp::PageStamper;
use crate::render::thumbnail::pdf_to_images;
use crate::render::{FrameRasterizer, PageRasterizer};

/// One tool invocation's parameters.
///
/// Page lists stay as the raw text the user typed; they are resolved against
/// the document's page count when the operation runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Merge,
    Split,
    ExtractPages { pages: String },
    RemovePages { pages: String },
    RearrangePages { order: String },
    Rotate(Rotation),
    Watermark { text: String },
    PageNumbers,
    ImagesToPdf,
    PdfToImages,
    Overlay,
    Redact,
    CreateFromText { title: String, text: String },
    Compress,
    /// A tool with no transformation of its own; the input comes back as is.
    PassThrough(ToolId),
}

impl Operation {
    /// The catalogue entry this operation belongs to.
    pub fn tool(&self) -> ToolId {
        match self {
            Self::Merge => ToolId::Merge,
            Self::Split => ToolId::Split,
            Self::ExtractPages { .. } => ToolId::ExtractPages,
            Self::RemovePages { .. } => ToolId::RemovePages,
            Self::RearrangePages { .. } => ToolId::RearrangePages,
            Self::Rotate(_) => ToolId::RotatePages,
            Self::Watermark { .. } => ToolId::AddWatermark,
            Self::PageNumbers => ToolId::AddPageNumbers,
            Self::ImagesToPdf => ToolId::ImagesToPdf,
            Self::PdfToImages => ToolId::PdfToImages,
            Self::Overlay => ToolId::PdfOverlay,
            Self::Redact => ToolId::RedactPdf,
            Self::CreateFromText { .. } => ToolId::CreatePdf,
            Self::Compress => ToolId::Compress,
            Self::PassThrough(tool) => *tool,
        }
    }
}

/// Runs operations. Holds no per-invocation state, so one dispatcher can be
/// shared (it is cheap to clone).
#[derive(Clone)]
pub struct Dispatcher {
    config: ToolConfig,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ToolConfig::default(), Arc::new(FrameRasterizer))
    }
}

impl Dispatcher {
    pub fn new(config: ToolConfig, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> Arc<dyn PageRasterizer> {
        Arc::clone(&self.rasterizer)
    }

    /// Run `operation` over `files`.
    #[instrument(skip_all, fields(tool = ?operation.tool(), files = files.len()))]
    pub fn run(&self, operation: &Operation, files: &[UploadFile]) -> Result<OperationResult> {
        info!("Running operation");

        let result = match operation {
            Operation::Merge => {
                if files.is_empty() {
                    return Err(FolioError::InvalidInput("select at least one PDF to merge".into()));
                }
                let buffers: Vec<&[u8]> = files.iter().map(UploadFile::data).collect();
                OperationResult::Document(merge_documents(&buffers)?)
            }
            Operation::Split => OperationResult::Documents(reader(files)?.split()?),
            Operation::ExtractPages { pages } => {
                let reader = reader(files)?;
                let selection = resolve_pages(pages, reader.page_count(), PageIntent::Extract)?;
                OperationResult::Document(reader.extract(&selection)?)
            }
            Operation::RemovePages { pages } => {
                let reader = reader(files)?;
                let selection = resolve_pages(pages, reader.page_count(), PageIntent::Remove)?;
                OperationResult::Document(reader.remove(&selection)?)
            }
            Operation::RearrangePages { order } => {
                let reader = reader(files)?;
                let selection = resolve_pages(order, reader.page_count(), PageIntent::Rearrange)?;
                OperationResult::Document(reader.rearrange(&selection)?)
            }
            Operation::Rotate(rotation) => {
                OperationResult::Document(reader(files)?.rotate_all(*rotation)?)
            }
            Operation::Watermark { text } => {
                OperationResult::Document(stamper(files)?.watermark(text)?)
            }
            Operation::PageNumbers => OperationResult::Document(stamper(files)?.page_numbers()?),
            Operation::Redact => OperationResult::Document(stamper(files)?.redact_top_band()?),
            Operation::ImagesToPdf => {
                if files.is_empty() {
                    return Err(FolioError::InvalidInput("select at least one image".into()));
                }
                OperationResult::Document(PdfWriter::letter().images_to_pdf(files)?)
            }
            Operation::PdfToImages => {
                let file = single(files)?;
                OperationResult::Images(pdf_to_images(
                    self.rasterizer.as_ref(),
                    file.data(),
                    self.config.export_scale,
                )?)
            }
            Operation::Overlay => {
                let [base, top] = files else {
                    return Err(FolioError::InvalidInput("Please select both PDF files".into()));
                };
                OperationResult::Document(overlay_documents(base.data(), top.data())?)
            }
            Operation::CreateFromText { title, text } => {
                let title = if title.trim().is_empty() { "Document" } else { title.as_str() };
                let writer = PdfWriter::new(self.config.text_paper_size);
                OperationResult::Document(writer.create_from_text(title, text)?)
            }
            Operation::Compress => OperationResult::Document(reader(files)?.compress()?),
            Operation::PassThrough(tool) => {
                let file = single(files)?;
                warn!(?tool, "Tool has no transformation; returning input unchanged");
                OperationResult::Document(file.data().to_vec())
            }
        };

        info!(outputs = result.len(), "Operation complete");
        Ok(result)
    }
}

fn single(files: &[UploadFile]) -> Result<&UploadFile> {
    match files {
        [file] => Ok(file),
        [] => Err(FolioError::InvalidInput("Please select a PDF file".into())),
        many => Err(FolioError::InvalidInput(format!(
            "this tool takes one file, got {}",
            many.len()
        ))),
    }
}

fn reader(files: &[UploadFile]) -> Result<PdfReader> {
    PdfReader::from_bytes(single(files)?.data())
}

fn stamper(files: &[UploadFile]) -> Result<PageStamper> {
    PageStamper::from_bytes(single(files)?.data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{labelled_pdf, numbered_pdf, page_count, page_labels, tiny_image};
    use folio_core::arrange::Arrangement;
    use folio_core::ArrangedItem;

    fn pdf(name: &str, bytes: Vec<u8>) -> UploadFile {
        UploadFile::new(name, "application/pdf", bytes)
    }

    fn document(result: OperationResult) -> Vec<u8> {
        match result {
            OperationResult::Document(bytes) => bytes,
            other => panic!("expected a single document, got {} buffers", other.len()),
        }
    }

    #[test]
    fn dragging_c_first_then_merging_gives_c_a_b() {
        let items: Vec<ArrangedItem> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let file = pdf(&format!("{label}.pdf"), labelled_pdf(&[label]));
                ArrangedItem::new(i, file, String::new())
            })
            .collect();
        let mut arrangement = Arrangement::new(items);
        let dragged = arrangement.items()[2].id.clone();
        let target = arrangement.items()[0].id.clone();
        let files = arrangement.move_by_drag(&dragged, &target);

        let merged = document(Dispatcher::default().run(&Operation::Merge, &files).unwrap());
        assert_eq!(page_labels(&merged), ["c", "a", "b"]);
    }

    #[test]
    fn remove_resolves_against_document() {
        let files = [pdf("ten.pdf", numbered_pdf("p", 10))];
        let op = Operation::RemovePages { pages: "2,4,6".into() };
        let out = document(Dispatcher::default().run(&op, &files).unwrap());
        assert_eq!(page_labels(&out), ["p1", "p3", "p5", "p7", "p8", "p9", "p10"]);
    }

    #[test]
    fn blank_page_list_uses_tool_specific_message() {
        let files = [pdf("a.pdf", numbered_pdf("p", 3))];
        let op = Operation::ExtractPages { pages: "  ".into() };
        let err = Dispatcher::default().run(&op, &files).unwrap_err();
        assert_eq!(err.to_string(), "Please enter page numbers to extract");
    }

    #[test]
    fn out_of_range_pages_are_rejected() {
        let files = [pdf("a.pdf", numbered_pdf("p", 3))];
        let op = Operation::RearrangePages { order: "0, 9, x".into() };
        assert!(matches!(
            Dispatcher::default().run(&op, &files),
            Err(FolioError::NoValidPages)
        ));
    }

    #[test]
    fn split_yields_one_buffer_per_page() {
        let files = [pdf("a.pdf", numbered_pdf("p", 4))];
        let result = Dispatcher::default().run(&Operation::Split, &files).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result.file_names("split")[3], "split-4.pdf");
    }

    #[test]
    fn overlay_needs_two_files() {
        let files = [pdf("a.pdf", numbered_pdf("p", 1))];
        let err = Dispatcher::default().run(&Operation::Overlay, &files).unwrap_err();
        assert_eq!(err.to_string(), "invalid input: Please select both PDF files");
    }

    #[test]
    fn pass_through_returns_input_bytes() {
        let bytes = numbered_pdf("p", 2);
        let files = [pdf("a.pdf", bytes.clone())];
        let op = Operation::PassThrough(ToolId::ProtectPdf);
        assert_eq!(document(Dispatcher::default().run(&op, &files).unwrap()), bytes);
        assert_eq!(op.tool(), ToolId::ProtectPdf);
    }

    #[test]
    fn corrupt_input_is_a_parse_error() {
        let files = [pdf("bad.pdf", b"not a pdf".to_vec())];
        let err = Dispatcher::default().run(&Operation::Rotate(Rotation::Half), &files).unwrap_err();
        assert!(matches!(err, FolioError::PdfParse(_)));
    }

    #[test]
    fn pdf_to_images_uses_export_scale() {
        let files = [pdf("a.pdf", numbered_pdf("p", 2))];
        let result = Dispatcher::default().run(&Operation::PdfToImages, &files).unwrap();
        assert!(matches!(result, OperationResult::Images(ref pages) if pages.len() == 2));

        let first = ::image::load_from_memory(result.buffers()[0]).unwrap();
        // Letter at 2x.
        assert_eq!((first.width(), first.height()), (1224, 1584));
    }

    #[test]
    fn images_to_pdf_skips_other_types() {
        let files = [
            UploadFile::new("a.png", "image/png", tiny_image(3, 3, ::image::ImageFormat::Png)),
            UploadFile::new("b.webp", "image/webp", vec![0; 4]),
        ];
        let out = document(Dispatcher::default().run(&Operation::ImagesToPdf, &files).unwrap());
        assert_eq!(page_count(&out), 1);
    }

    #[test]
    fn create_from_text_needs_no_files() {
        let op = Operation::CreateFromText {
            title: String::new(),
            text: "hello".into(),
        };
        let out = document(Dispatcher::default().run(&op, &[]).unwrap());
        assert_eq!(page_count(&out), 1);
    }
}
