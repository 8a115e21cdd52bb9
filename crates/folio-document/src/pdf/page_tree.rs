// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page tree helpers shared by the page operations: flattening inherited page
// attributes, rebuilding /Kids from an ordered page list, and serialising.

use std::collections::HashSet;

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Load a document, mapping any failure to a parse error.
pub fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|err| FolioError::PdfParse(err.to_string()))
}

/// Serialise `doc`, dropping objects that are no longer reachable.
pub fn save(doc: &mut Document, what: &str) -> Result<Vec<u8>> {
    doc.prune_objects();
    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        FolioError::PdfError(format!("failed to serialise {what}: {err}"))
    })?;
    debug!(what, output_bytes = output.len(), "document serialised");
    Ok(output)
}

/// Page object ids in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Id of the root `/Pages` node.
pub fn pages_root(doc: &Document) -> Result<ObjectId> {
    let catalog = doc
        .catalog()
        .map_err(|err| FolioError::PdfError(format!("no catalog: {err}")))?;
    catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| FolioError::PdfError(format!("no /Pages reference: {err}")))
}

/// Look up `key` on a page, walking up `/Parent` links if the page itself
/// does not carry it.
pub fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    let mut seen = HashSet::new();

    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Copy inherited attributes onto every page so pages stay self-contained
/// once they are moved to a different parent.
pub fn flatten_inherited(doc: &mut Document) {
    let mut updates: Vec<(ObjectId, &[u8], Object)> = Vec::new();

    for page_id in page_ids(doc) {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(doc, page_id, key) {
                updates.push((page_id, key, value));
            }
        }
    }

    for (page_id, key, value) in updates {
        if let Ok(page) = doc.get_dictionary_mut(page_id) {
            page.set(key.to_vec(), value);
        }
    }
}

/// Make `pages` (in order) the complete, flat list of pages under the root
/// `/Pages` node. A page id listed more than once is duplicated as a new page
/// object sharing the same content.
///
/// Call [`flatten_inherited`] first; intermediate page tree nodes become
/// unreachable and are dropped on save.
pub fn rebuild(doc: &mut Document, pages: &[ObjectId]) -> Result<()> {
    let root = pages_root(doc)?;
    let mut used = HashSet::new();
    let mut kids = Vec::with_capacity(pages.len());

    for &page_id in pages {
        let id = if used.insert(page_id) {
            page_id
        } else {
            let copy: Dictionary = doc
                .get_dictionary(page_id)
                .map_err(|err| FolioError::PdfError(format!("cannot copy page {page_id:?}: {err}")))?
                .clone();
            doc.add_object(copy)
        };
        if let Ok(page) = doc.get_dictionary_mut(id) {
            page.set("Parent", Object::Reference(root));
        }
        kids.push(Object::Reference(id));
    }

    let root_dict = doc
        .get_dictionary_mut(root)
        .map_err(|err| FolioError::PdfError(format!("invalid /Pages node: {err}")))?;
    root_dict.set("Count", Object::Integer(kids.len() as i64));
    root_dict.set("Kids", Object::Array(kids));
    Ok(())
}

/// Effective MediaBox of a page as `[x0, y0, x1, y1]`.
pub fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(Object::Array(values)) =
        inherited(doc, page_id, b"MediaBox").map(|obj| resolve(doc, obj))
    else {
        return DEFAULT_MEDIA_BOX;
    };
    if values.len() != 4 {
        return DEFAULT_MEDIA_BOX;
    }

    let mut rect = [0.0f32; 4];
    for (slot, value) in rect.iter_mut().zip(values.iter()) {
        match resolve(doc, value.clone()).as_float() {
            Ok(v) => *slot = v,
            Err(_) => return DEFAULT_MEDIA_BOX,
        }
    }
    rect
}

/// Effective `/Rotate` of a page, defaulting to 0.
pub fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited(doc, page_id, b"Rotate")
        .map(|obj| resolve(doc, obj))
        .and_then(|obj| match obj {
            Object::Integer(degrees) => Some(degrees),
            Object::Real(degrees) => Some(degrees.round() as i64),
            _ => None,
        })
        .unwrap_or(0)
}

/// Follow a single level of indirection.
pub fn resolve(doc: &Document, object: Object) -> Object {
    match object {
        Object::Reference(id) => doc.get_object(id).cloned().unwrap_or(Object::Null),
        other => other,
    }
}
