// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page stamping: draw new content on top of every page of an existing PDF:
// a diagonal watermark, page numbers, or a redaction band.
//
// The existing content streams are wrapped in `q`/`Q` so whatever graphics
// state they leave behind does not leak into the stamp.

use folio_core::error::{FolioError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::{debug, info, instrument};

use super::page_tree;

const FONT_KEY: &str = "FolioF1";
const ALPHA_KEY: &str = "FolioGS";

/// Watermark appearance.
const WATERMARK_SIZE: f32 = 48.0;
const WATERMARK_GRAY: f32 = 200.0 / 255.0;
const WATERMARK_OPACITY: f32 = 0.3;
const WATERMARK_ANGLE_DEG: f32 = -45.0;
/// Horizontal offset of the watermark anchor left of the page centre.
const WATERMARK_OFFSET: f32 = 100.0;

/// Page number position, from the page's lower-left corner.
const NUMBER_X: f32 = 50.0;
const NUMBER_Y: f32 = 20.0;
const NUMBER_SIZE: f32 = 12.0;

/// Height of the band blacked out at the top of each page.
const REDACT_BAND: f32 = 100.0;

/// Draws content over the pages of an existing PDF.
pub struct PageStamper {
    document: Document,
}

impl PageStamper {
    /// Load a PDF from raw bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut document = page_tree::load(data)?;
        page_tree::flatten_inherited(&mut document);
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Draw `text` diagonally across the middle of every page, in light gray
    /// at 30% opacity.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn watermark(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(FolioError::InvalidInput("watermark text is empty".into()));
        }
        info!("Adding watermark");

        let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
        let encoded = encode_text(text);

        self.stamp("watermarked PDF", |_, [x0, y0, x1, y1]| {
            let x = x0 + (x1 - x0) / 2.0 - WATERMARK_OFFSET;
            let y = y0 + (y1 - y0) / 2.0;
            vec![
                Operation::new("gs", vec![Object::Name(ALPHA_KEY.into())]),
                Operation::new("rg", vec![real(WATERMARK_GRAY), real(WATERMARK_GRAY), real(WATERMARK_GRAY)]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(FONT_KEY.into()), real(WATERMARK_SIZE)]),
                Operation::new("Tm", vec![real(cos), real(sin), real(-sin), real(cos), real(x), real(y)]),
                Operation::new("Tj", vec![Object::String(encoded.clone(), StringFormat::Literal)]),
                Operation::new("ET", vec![]),
            ]
        })
    }

    /// Number every page, 1-based, near its bottom-left corner.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn page_numbers(&self) -> Result<Vec<u8>> {
        info!("Adding page numbers");
        self.stamp("numbered PDF", |index, [x0, y0, _, _]| {
            let label = (index + 1).to_string();
            vec![
                Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(FONT_KEY.into()), real(NUMBER_SIZE)]),
                Operation::new("Td", vec![real(x0 + NUMBER_X), real(y0 + NUMBER_Y)]),
                Operation::new("Tj", vec![Object::String(label.into_bytes(), StringFormat::Literal)]),
                Operation::new("ET", vec![]),
            ]
        })
    }

    /// Cover the top band of every page with an opaque black rectangle.
    ///
    /// The rectangle is drawn over the content; the underlying text is still
    /// present in the content stream.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn redact_top_band(&self) -> Result<Vec<u8>> {
        info!("Redacting top band");
        self.stamp("redacted PDF", |_, [x0, _, x1, y1]| {
            vec![
                Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
                Operation::new(
                    "re",
                    vec![real(x0), real(y1 - REDACT_BAND), real(x1 - x0), real(REDACT_BAND)],
                ),
                Operation::new("f", vec![]),
            ]
        })
    }

    // -- Helpers --------------------------------------------------------------

    /// Append the operations produced by `ops_for(page_index, media_box)` to
    /// every page of a copy of the document.
    fn stamp<F>(&self, what: &str, ops_for: F) -> Result<Vec<u8>>
    where
        F: Fn(usize, [f32; 4]) -> Vec<Operation>,
    {
        let mut doc = self.document.clone();
        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let alpha_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"ExtGState".to_vec())),
            ("ca", real(WATERMARK_OPACITY)),
            ("CA", real(WATERMARK_OPACITY)),
        ]));
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

        for (index, page_id) in page_tree::page_ids(&doc).into_iter().enumerate() {
            let media_box = page_tree::media_box(&doc, page_id);

            let mut body = b"\nQ\nq\n".to_vec();
            let ops = Content { operations: ops_for(index, media_box) };
            body.extend(ops.encode().map_err(|err| {
                FolioError::PdfError(format!("failed to encode stamp for page {}: {err}", index + 1))
            })?);
            body.extend_from_slice(b"\nQ\n");
            let stamp_id = doc.add_object(Stream::new(Dictionary::new(), body));

            let resources = stamped_resources(&doc, page_id, font_id, alpha_id);
            let mut contents = vec![Object::Reference(save_id)];
            contents.extend(existing_contents(&doc, page_id));
            contents.push(Object::Reference(stamp_id));

            let page = doc.get_dictionary_mut(page_id).map_err(|err| {
                FolioError::PdfError(format!("page {page_id:?} is not a dictionary: {err}"))
            })?;
            page.set("Resources", Object::Dictionary(resources));
            page.set("Contents", Object::Array(contents));
            debug!(page = index + 1, "Page stamped");
        }

        page_tree::save(&mut doc, what)
    }
}

/// The page's resources with the stamp font and graphics state added.
fn stamped_resources(doc: &Document, page_id: ObjectId, font_id: ObjectId, alpha_id: ObjectId) -> Dictionary {
    let mut resources = page_tree::inherited(doc, page_id, b"Resources")
        .map(|obj| page_tree::resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok().cloned())
        .unwrap_or_default();

    let mut add = |category: &[u8], key: &str, id: ObjectId| {
        let mut sub = resources
            .get(category)
            .ok()
            .map(|obj| page_tree::resolve(doc, obj.clone()))
            .and_then(|obj| obj.as_dict().ok().cloned())
            .unwrap_or_default();
        sub.set(key, Object::Reference(id));
        resources.set(category.to_vec(), Object::Dictionary(sub));
    };
    add(b"Font", FONT_KEY, font_id);
    add(b"ExtGState", ALPHA_KEY, alpha_id);
    resources
}

fn existing_contents(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Encode text for a WinAnsi Helvetica font. Characters outside Latin-1
/// become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, build_pdf, numbered_pdf, page_dicts, page_labels};

    fn content_of(bytes: &[u8], page: usize) -> String {
        let (doc, ids) = page_dicts(bytes);
        String::from_utf8_lossy(&doc.get_page_content(ids[page]).unwrap()).into_owned()
    }

    #[test]
    fn watermark_is_drawn_on_every_page() {
        let out = PageStamper::from_bytes(&numbered_pdf("p", 3))
            .unwrap()
            .watermark("DRAFT")
            .unwrap();
        assert_eq!(page_labels(&out), ["p1", "p2", "p3"]);
        for page in 0..3 {
            let content = content_of(&out, page);
            assert!(content.contains("(DRAFT) Tj"), "page {page}: {content}");
            assert!(content.contains("/FolioGS gs"));
        }
    }

    #[test]
    fn watermark_registers_font_and_alpha() {
        let out = PageStamper::from_bytes(&numbered_pdf("p", 1))
            .unwrap()
            .watermark("DRAFT")
            .unwrap();
        let (doc, ids) = page_dicts(&out);
        let resources = doc.get_dictionary(ids[0]).unwrap().get(b"Resources").unwrap().as_dict().unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(b"F1"), "original font kept");
        assert!(fonts.has(FONT_KEY.as_bytes()));
        assert!(resources.get(b"ExtGState").unwrap().as_dict().unwrap().has(ALPHA_KEY.as_bytes()));
    }

    #[test]
    fn blank_watermark_is_rejected() {
        let stamper = PageStamper::from_bytes(&numbered_pdf("p", 1)).unwrap();
        assert!(matches!(stamper.watermark("  "), Err(FolioError::InvalidInput(_))));
    }

    #[test]
    fn page_numbers_are_one_based() {
        let out = PageStamper::from_bytes(&numbered_pdf("p", 3))
            .unwrap()
            .page_numbers()
            .unwrap();
        assert!(content_of(&out, 0).contains("(1) Tj"));
        assert!(content_of(&out, 2).contains("(3) Tj"));
    }

    #[test]
    fn stamping_keeps_content_behind_an_indirect_array() {
        let bytes = build_pdf(&Fixture {
            labels: &["p1"],
            indirect_contents_array: true,
            ..Default::default()
        });
        let out = PageStamper::from_bytes(&bytes).unwrap().page_numbers().unwrap();
        let (doc, ids) = page_dicts(&out);
        let contents = doc.get_dictionary(ids[0]).unwrap().get(b"Contents").unwrap().as_array().unwrap();
        for item in contents {
            let id = item.as_reference().unwrap();
            assert!(doc.get_object(id).unwrap().as_stream().is_ok(), "{id:?} is not a stream");
        }
        let content = content_of(&out, 0);
        assert!(content.contains("(p1) Tj"), "{content}");
        assert!(content.contains("(1) Tj"), "{content}");
    }

    #[test]
    fn redaction_covers_top_of_page() {
        let bytes = build_pdf(&Fixture {
            labels: &["a"],
            media_box: Some([0, 0, 400, 600]),
            ..Default::default()
        });
        let out = PageStamper::from_bytes(&bytes).unwrap().redact_top_band().unwrap();
        let content = Content::decode(content_of(&out, 0).as_bytes()).unwrap();
        let rect = content
            .operations
            .iter()
            .find(|op| op.operator == "re")
            .expect("rectangle drawn");
        let values: Vec<f32> = rect.operands.iter().map(|o| o.as_float().unwrap()).collect();
        assert_eq!(values, [0.0, 500.0, 400.0, 100.0]);
        assert!(content.operations.iter().any(|op| op.operator == "f"));
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(encode_text("Año ✓"), vec![b'A', 0xF1, b'o', b' ', b'?']);
    }
}
