// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: create new PDF documents from text or images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use folio_core::error::{FolioError, Result};
use folio_core::{PaperSize, UploadFile};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

/// Text layout, in points.
const MARGIN_X: f32 = 50.0;
const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 20.0;
const MAX_LINE_WIDTH: f32 = 500.0;
/// Distance from the top edge to the title baseline, and to the first body
/// line on a continuation page.
const TOP_OFFSET: f32 = 42.0;
/// Distance from the top edge to the first body line under the title.
const BODY_OFFSET: f32 = 92.0;
/// Lines are never drawn below this baseline.
const BOTTOM_LIMIT: f32 = 50.0;

/// Images are placed at one pixel per point.
const IMAGE_DPI: f32 = 72.0;

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    /// Paper size for text pages. Image pages are sized to the image.
    paper_size: PaperSize,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self { paper_size }
    }

    /// Create a new writer defaulting to US Letter.
    pub fn letter() -> Self {
        Self::new(PaperSize::Letter)
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF from a title and plain text.
    ///
    /// The title is set in 24pt Helvetica at the top of the first page. The
    /// text follows in 12pt, one line per input line (long lines are
    /// wrapped), 20pt apart. When the next line would fall below the bottom
    /// margin, a new page is started and the line is drawn there.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn create_from_text(&self, title: &str, text: &str) -> Result<Vec<u8>> {
        let (width_pt, height_pt) = self.paper_size.dimensions_pt();
        let (page_w, page_h) = (pt_to_mm(width_pt), pt_to_mm(height_pt));

        info!(paper = ?self.paper_size, title, "Creating text PDF");

        // Average Helvetica glyph width is roughly half the font size.
        let max_chars = (MAX_LINE_WIDTH / (0.5 * BODY_SIZE)) as usize;
        let lines = wrap_text(text, max_chars);

        let mut pages: Vec<PdfPage> = Vec::new();
        let mut ops: Vec<Op> = text_ops(title, TITLE_SIZE, MARGIN_X, height_pt - TOP_OFFSET);
        let mut y = height_pt - BODY_OFFSET;

        for line in &lines {
            if y < BOTTOM_LIMIT {
                pages.push(PdfPage::new(page_w, page_h, std::mem::take(&mut ops)));
                y = height_pt - TOP_OFFSET;
            }
            if !line.is_empty() {
                ops.extend(text_ops(line, BODY_SIZE, MARGIN_X, y));
            }
            y -= LINE_HEIGHT;
        }
        pages.push(PdfPage::new(page_w, page_h, ops));

        debug!(total_lines = lines.len(), pages = pages.len(), "Text layout complete");

        let mut doc = PdfDocument::new(title);
        doc.with_pages(pages);
        Ok(save(&doc))
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per PNG or JPEG image, each page exactly the
    /// size of its image. Files of any other type are skipped.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn images_to_pdf(&self, files: &[UploadFile]) -> Result<Vec<u8>> {
        info!("Creating PDF from images");

        let mut doc = PdfDocument::new("Images");
        let mut pages = Vec::new();

        for file in files {
            if !file.document_type().is_embeddable_image() {
                warn!(name = %file.name, mime = %file.mime_type, "Skipping unsupported file type");
                continue;
            }

            let decoded = ::image::load_from_memory(file.data()).map_err(|err| {
                FolioError::ImageError(format!("failed to decode {}: {err}", file.name))
            })?;
            let rgb = decoded.to_rgb8();
            let (width, height) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(IMAGE_DPI),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(pt_to_mm(width as f32), pt_to_mm(height as f32), ops));
            debug!(name = %file.name, width, height, "Image placed on page");
        }

        if pages.is_empty() {
            return Err(FolioError::InvalidInput("no PNG or JPEG images to convert".into()));
        }

        doc.with_pages(pages);
        Ok(save(&doc))
    }
}

fn text_ops(text: &str, size: f32, x: f32, y: f32) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font: BuiltinFont::Helvetica,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: BuiltinFont::Helvetica,
        },
        Op::EndTextSection,
    ]
}

fn save(doc: &PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        debug!(warnings = warnings.len(), "printpdf reported warnings");
    }
    output
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within each
/// paragraph. Words longer than `max_width` are force-broken.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::with_capacity(max_width);

        for word in words {
            let word_len = word.chars().count();
            let current_len = current_line.chars().count();
            if word_len > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        result.push(chunk.iter().collect());
                    } else {
                        current_line.extend(chunk);
                    }
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
            } else if current_len + 1 + word_len <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_string()));
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}
