// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thumbnails and page export.
//
// Thumbnails are rendered from page 1 of each file, one blocking task per
// file, all in flight at once. A file that cannot be rendered gets a generic
// placeholder instead; the batch as a whole never fails.

use std::sync::Arc;

use folio_core::error::{FolioError, Result};
use folio_core::{ArrangedItem, UploadFile};
use tracing::{debug, info, instrument, warn};

use super::PageRasterizer;
use crate::image::ImageProcessor;

/// Grey 120x160 card reading "PDF".
pub const PLACEHOLDER_THUMBNAIL: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='120' height='160'%3E%3Crect fill='%23f0f0f0' width='120' height='160'/%3E%3Ctext x='50%25' y='50%25' font-size='12' text-anchor='middle' dominant-baseline='middle' fill='%23999'%3EPDF%3C/text%3E%3C/svg%3E";

/// Render the first page of each file at `scale` and pair it with the file.
///
/// The result has one item per input file, in input order.
#[instrument(skip_all, fields(files = files.len(), scale))]
pub async fn generate_thumbnails(
    files: Vec<UploadFile>,
    rasterizer: Arc<dyn PageRasterizer>,
    scale: f32,
) -> Vec<ArrangedItem> {
    info!("Generating thumbnails");

    let tasks: Vec<_> = files
        .iter()
        .cloned()
        .map(|file| {
            let rasterizer = Arc::clone(&rasterizer);
            tokio::task::spawn_blocking(move || first_page_data_uri(rasterizer.as_ref(), &file, scale))
        })
        .collect();

    let mut items = Vec::with_capacity(files.len());
    for (position, (file, task)) in files.into_iter().zip(tasks).enumerate() {
        let rendered = match task.await {
            Ok(result) => result,
            Err(join_err) => Err(FolioError::Render(format!("thumbnail task failed: {join_err}"))),
        };
        let thumbnail = rendered.unwrap_or_else(|err| {
            warn!(name = %file.name, error = %err, "Thumbnail failed; using placeholder");
            PLACEHOLDER_THUMBNAIL.to_string()
        });
        items.push(ArrangedItem::new(position, file, thumbnail));
    }

    debug!(items = items.len(), "Thumbnails ready");
    items
}

fn first_page_data_uri(rasterizer: &dyn PageRasterizer, file: &UploadFile, scale: f32) -> Result<String> {
    let page = rasterizer.render_page(file.data(), 0, scale)?;
    ImageProcessor::from_rgba(page).to_png_data_uri()
}

/// Render every page of `document` at `scale`, one PNG per page in page order.
#[instrument(skip_all, fields(bytes_len = document.len(), scale))]
pub fn pdf_to_images(rasterizer: &dyn PageRasterizer, document: &[u8], scale: f32) -> Result<Vec<Vec<u8>>> {
    let pages = rasterizer.page_count(document)?;
    info!(pages, "Exporting pages as images");

    (0..pages)
        .map(|index| {
            let page = rasterizer.render_page(document, index, scale)?;
            ImageProcessor::from_rgba(page).to_png_bytes()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FrameRasterizer;
    use crate::test_support::{Fixture, build_pdf, labelled_pdf};

    fn pdf(name: &str) -> UploadFile {
        UploadFile::new(name, "application/pdf", labelled_pdf(&[name]))
    }

    #[tokio::test]
    async fn thumbnails_preserve_input_order() {
        let files = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")];
        let items = generate_thumbnails(files, Arc::new(FrameRasterizer), 1.5).await;

        let names: Vec<&str> = items.iter().map(|i| i.file.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
        assert!(items.iter().all(|i| i.thumbnail.starts_with("data:image/png;base64,")));
    }

    #[tokio::test]
    async fn corrupt_file_gets_placeholder_without_failing_batch() {
        let files = vec![
            pdf("good.pdf"),
            UploadFile::new("broken.pdf", "application/pdf", b"%PDF-garbage".to_vec()),
        ];
        let items = generate_thumbnails(files, Arc::new(FrameRasterizer), 1.5).await;

        assert_eq!(items.len(), 2);
        assert!(items[0].thumbnail.starts_with("data:image/png"));
        assert_eq!(items[1].thumbnail, PLACEHOLDER_THUMBNAIL);
    }

    #[tokio::test]
    async fn stable_ids_are_unique_for_duplicate_names() {
        let files = vec![pdf("same.pdf"), pdf("same.pdf")];
        let items = generate_thumbnails(files, Arc::new(FrameRasterizer), 1.0).await;
        assert_ne!(items[0].id, items[1].id);
    }

    #[test]
    fn export_renders_each_page_as_png() {
        let bytes = build_pdf(&Fixture {
            labels: &["a", "b", "c"],
            media_box: Some([0, 0, 50, 40]),
            ..Default::default()
        });
        let images = pdf_to_images(&FrameRasterizer, &bytes, 2.0).unwrap();
        assert_eq!(images.len(), 3);

        let first = ::image::load_from_memory(&images[0]).unwrap();
        assert_eq!((first.width(), first.height()), (100, 80));
    }
}
