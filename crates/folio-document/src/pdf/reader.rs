// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open an existing document and derive new documents from its
// pages: split, extract, remove, rearrange, rotate, and compress.

use folio_core::error::{FolioError, Result};
use folio_core::{PageSelection, Rotation};
use lopdf::{Document, Object};
use tracing::{debug, info, instrument};

use super::page_tree;

/// An existing PDF loaded for page-level operations.
///
/// Every operation works on a copy, so one reader can serve several
/// operations and the loaded document is never modified.
pub struct PdfReader {
    /// The underlying lopdf document, with inherited page attributes flattened.
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Load a PDF from raw bytes. Anything lopdf cannot parse is a
    /// [`FolioError::PdfParse`].
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut document = page_tree::load(data)?;
        page_tree::flatten_inherited(&mut document);

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    // -- Derived documents ----------------------------------------------------

    /// One single-page document per page, in page order.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn split(&self) -> Result<Vec<Vec<u8>>> {
        info!("Splitting PDF into single pages");
        page_tree::page_ids(&self.document)
            .into_iter()
            .map(|page_id| self.with_pages(&[page_id], "split page"))
            .collect()
    }

    /// A new document containing the selected pages, in selection order.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn extract(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        info!(pages = self.page_count(), "Extracting pages");
        self.select(selection, "extracted pages")
    }

    /// A new document whose pages follow `selection`, which may repeat or
    /// omit pages.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn rearrange(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        info!(pages = self.page_count(), "Rearranging pages");
        self.select(selection, "rearranged pages")
    }

    /// The document without the selected pages.
    ///
    /// Pages are deleted one at a time from the highest index down, so each
    /// deletion leaves the lower original indices untouched.
    #[instrument(skip_all, fields(selected = selection.len()))]
    pub fn remove(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        let order = selection.removal_order();
        info!(pages = self.page_count(), removing = order.len(), "Removing pages");

        let mut doc = self.document.clone();
        for index in order {
            // lopdf page numbers are 1-based.
            doc.delete_pages(&[index as u32 + 1]);
        }
        debug!(remaining = doc.get_pages().len(), "Pages removed");
        page_tree::save(&mut doc, "PDF with pages removed")
    }

    /// Rotate every page by `rotation`, on top of its current `/Rotate`.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn rotate_all(&self, rotation: Rotation) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();

        for page_id in page_tree::page_ids(&doc) {
            let existing = page_tree::rotation(&doc, page_id);
            let updated = rotation.apply_to(existing);
            let page = doc.get_dictionary_mut(page_id).map_err(|err| {
                FolioError::PdfError(format!("page {page_id:?} is not a dictionary: {err}"))
            })?;
            page.set("Rotate", Object::Integer(updated));
            debug!(?page_id, existing, updated, "Page rotated");
        }

        info!(degrees = rotation.degrees(), "Pages rotated");
        page_tree::save(&mut doc, "rotated PDF")
    }

    /// Re-save with unreachable objects dropped and streams Flate-compressed.
    #[instrument(skip(self))]
    pub fn compress(&self) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();
        doc.prune_objects();
        doc.compress();
        let output = page_tree::save(&mut doc, "compressed PDF")?;
        info!(output_bytes = output.len(), "PDF compressed");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    fn select(&self, selection: &PageSelection, what: &str) -> Result<Vec<u8>> {
        let ids = page_tree::page_ids(&self.document);
        let chosen = selection
            .indices()
            .iter()
            .map(|&index| {
                ids.get(index).copied().ok_or_else(|| {
                    FolioError::PdfError(format!(
                        "page index {index} out of range (document has {} pages)",
                        ids.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.with_pages(&chosen, what)
    }

    fn with_pages(&self, pages: &[lopdf::ObjectId], what: &str) -> Result<Vec<u8>> {
        let mut doc = self.document.clone();
        page_tree::rebuild(&mut doc, pages)?;
        page_tree::save(&mut doc, what)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, build_pdf, numbered_pdf, page_count, page_dicts, page_labels};
    use folio_core::pages::{PageIntent, resolve_pages};

    fn reader(bytes: &[u8]) -> PdfReader {
        PdfReader::from_bytes(bytes).unwrap()
    }

    #[test]
    fn split_produces_one_document_per_page() {
        let parts = reader(&numbered_pdf("p", 3)).split().unwrap();
        assert_eq!(parts.len(), 3);
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(page_labels(part), [format!("p{}", i + 1)]);
        }
    }

    #[test]
    fn extract_follows_selection_order() {
        let r = reader(&numbered_pdf("p", 5));
        let sel = resolve_pages("4,2", r.page_count(), PageIntent::Extract).unwrap();
        assert_eq!(page_labels(&r.extract(&sel).unwrap()), ["p4", "p2"]);
    }

    #[test]
    fn remove_even_pages_from_ten() {
        let r = reader(&numbered_pdf("p", 10));
        let sel = resolve_pages("2,4,6", r.page_count(), PageIntent::Remove).unwrap();
        let out = r.remove(&sel).unwrap();
        assert_eq!(page_count(&out), 7);
        assert_eq!(page_labels(&out), ["p1", "p3", "p5", "p7", "p8", "p9", "p10"]);
    }

    #[test]
    fn remove_order_of_input_does_not_matter() {
        let r = reader(&numbered_pdf("p", 6));
        let a = resolve_pages("5,1,3", 6, PageIntent::Remove).unwrap();
        let b = resolve_pages("1,3,5", 6, PageIntent::Remove).unwrap();
        assert_eq!(page_labels(&r.remove(&a).unwrap()), ["p2", "p4", "p6"]);
        assert_eq!(page_labels(&r.remove(&b).unwrap()), ["p2", "p4", "p6"]);
    }

    #[test]
    fn repeated_removal_index_removes_one_page() {
        let r = reader(&numbered_pdf("p", 4));
        let sel = resolve_pages("2,2", 4, PageIntent::Remove).unwrap();
        assert_eq!(page_labels(&r.remove(&sel).unwrap()), ["p1", "p3", "p4"]);
    }

    #[test]
    fn rearrange_allows_duplicates() {
        let r = reader(&numbered_pdf("p", 3));
        let sel = resolve_pages("3,3,1", 3, PageIntent::Rearrange).unwrap();
        assert_eq!(page_labels(&r.rearrange(&sel).unwrap()), ["p3", "p3", "p1"]);
    }

    #[test]
    fn rotate_wraps_at_full_turn() {
        let bytes = build_pdf(&Fixture {
            labels: &["a", "b"],
            rotate: Some(270),
            ..Default::default()
        });
        let out = reader(&bytes).rotate_all(Rotation::Quarter).unwrap();
        let (doc, ids) = page_dicts(&out);
        for id in ids {
            assert_eq!(page_tree::rotation(&doc, id), 0);
        }
    }

    #[test]
    fn rotate_applies_to_unrotated_pages() {
        let out = reader(&numbered_pdf("p", 2))
            .rotate_all(Rotation::ThreeQuarter)
            .unwrap();
        let (doc, ids) = page_dicts(&out);
        assert!(ids.iter().all(|id| page_tree::rotation(&doc, *id) == 270));
    }

    #[test]
    fn extract_keeps_inherited_media_box() {
        let bytes = build_pdf(&Fixture {
            labels: &["a", "b"],
            inherit_from_root: true,
            media_box: Some([0, 0, 200, 100]),
            ..Default::default()
        });
        let r = reader(&bytes);
        let sel = resolve_pages("2", 2, PageIntent::Extract).unwrap();
        let (doc, ids) = page_dicts(&r.extract(&sel).unwrap());
        assert_eq!(page_tree::media_box(&doc, ids[0]), [0.0, 0.0, 200.0, 100.0]);
    }

    #[test]
    fn compress_keeps_pages() {
        let out = reader(&numbered_pdf("p", 3)).compress().unwrap();
        assert_eq!(page_labels(&out), ["p1", "p2", "p3"]);
    }
}
