// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF merging: concatenate the pages of several documents into one.
//
// The first document is the base. Every later document has its object ids
// shifted past the base's highest id, its objects are copied in, and its
// pages are appended to the base's page tree.

use folio_core::error::{FolioError, Result};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use super::page_tree;

/// Merge `documents` into a single PDF whose pages are every page of the
/// first document, then every page of the second, and so on.
#[instrument(skip_all, fields(documents = documents.len()))]
pub fn merge_documents(documents: &[&[u8]]) -> Result<Vec<u8>> {
    let Some((first, rest)) = documents.split_first() else {
        return Err(FolioError::InvalidInput("no documents to merge".into()));
    };

    let mut dest = load_flat(first, 0)?;
    let mut pages = page_tree::page_ids(&dest);

    for (offset_index, bytes) in rest.iter().enumerate() {
        let source = load_flat(bytes, offset_index + 1)?;
        let offset = dest.max_id;
        let source_pages = page_tree::page_ids(&source);
        debug!(
            document = offset_index + 1,
            pages = source_pages.len(),
            offset,
            "Importing document"
        );

        for (id, object) in source.objects {
            dest.objects.insert(shift(id, offset), remap(object, offset));
        }
        pages.extend(source_pages.into_iter().map(|id| shift(id, offset)));
        dest.max_id = dest.max_id.max(source.max_id + offset);
    }

    page_tree::rebuild(&mut dest, &pages)?;
    info!(pages = pages.len(), "Documents merged");
    page_tree::save(&mut dest, "merged PDF")
}

/// Overlay `top` on `base`.
///
/// Pages are appended rather than composited, so the result is the base
/// document's pages followed by the overlay's pages.
#[instrument(skip_all)]
pub fn overlay_documents(base: &[u8], top: &[u8]) -> Result<Vec<u8>> {
    merge_documents(&[base, top])
}

fn load_flat(bytes: &[u8], position: usize) -> Result<Document> {
    let mut doc = page_tree::load(bytes).map_err(|err| match err {
        FolioError::PdfParse(msg) => FolioError::PdfParse(format!("document {}: {msg}", position + 1)),
        other => other,
    })?;
    page_tree::flatten_inherited(&mut doc);
    Ok(doc)
}

fn shift(id: ObjectId, offset: u32) -> ObjectId {
    (id.0 + offset, id.1)
}

/// Shift every reference inside `object` by `offset`.
fn remap(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference(shift(id, offset)),
        Object::Array(items) => {
            Object::Array(items.into_iter().map(|item| remap(item, offset)).collect())
        }
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap(std::mem::replace(value, Object::Null), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap(std::mem::replace(value, Object::Null), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, build_pdf, labelled_pdf, numbered_pdf, page_count, page_labels};

    #[test]
    fn page_count_is_sum_of_inputs() {
        let a = numbered_pdf("a", 2);
        let b = numbered_pdf("b", 3);
        let c = numbered_pdf("c", 1);
        let merged = merge_documents(&[&a, &b, &c]).unwrap();
        assert_eq!(page_count(&merged), 6);
    }

    #[test]
    fn pages_follow_input_order() {
        let a = labelled_pdf(&["a"]);
        let b = labelled_pdf(&["b"]);
        let c = labelled_pdf(&["c"]);
        let merged = merge_documents(&[&c, &a, &b]).unwrap();
        assert_eq!(page_labels(&merged), ["c", "a", "b"]);
    }

    #[test]
    fn multi_page_inputs_keep_file_then_page_order() {
        let merged = merge_documents(&[&numbered_pdf("a", 2), &numbered_pdf("b", 3)]).unwrap();
        assert_eq!(page_labels(&merged), ["a1", "a2", "b1", "b2", "b3"]);
    }

    #[test]
    fn single_document_round_trips_its_pages() {
        let a = numbered_pdf("p", 3);
        assert_eq!(page_labels(&merge_documents(&[&a]).unwrap()), ["p1", "p2", "p3"]);
    }

    #[test]
    fn inherited_attributes_survive_merge() {
        let a = build_pdf(&Fixture {
            labels: &["x"],
            inherit_from_root: true,
            media_box: Some([0, 0, 100, 200]),
            ..Default::default()
        });
        let b = labelled_pdf(&["y"]);
        let merged = merge_documents(&[&b, &a]).unwrap();

        let (doc, ids) = crate::test_support::page_dicts(&merged);
        assert_eq!(page_tree::media_box(&doc, ids[1]), [0.0, 0.0, 100.0, 200.0]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(merge_documents(&[]), Err(FolioError::InvalidInput(_))));
    }

    #[test]
    fn unparseable_document_names_its_position() {
        let a = labelled_pdf(&["a"]);
        let err = merge_documents(&[&a, b"junk"]).unwrap_err();
        match err {
            FolioError::PdfParse(msg) => assert!(msg.starts_with("document 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn overlay_appends_top_after_base() {
        let base = labelled_pdf(&["base"]);
        let top = labelled_pdf(&["top"]);
        assert_eq!(page_labels(&overlay_documents(&base, &top).unwrap()), ["base", "top"]);
    }
}
