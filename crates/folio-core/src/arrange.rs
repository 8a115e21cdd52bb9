// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Arrangement: the ordered list of thumbnailed files a user reorders before
// merging.

use tracing::debug;

use crate::types::UploadFile;

/// Identifier that survives reordering: `{original position}-{file name}`.
///
/// Including the position keeps two files with the same name distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StableId(String);

impl StableId {
    pub fn new(position: usize, name: &str) -> Self {
        Self(format!("{position}-{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in the arrangement: the file, its first-page preview, and its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrangedItem {
    pub file: UploadFile,
    /// Preview image as a `data:` URI.
    pub thumbnail: String,
    pub id: StableId,
}

impl ArrangedItem {
    /// Tag a file with the id derived from its position in the uploaded batch.
    pub fn new(position: usize, file: UploadFile, thumbnail: String) -> Self {
        let id = StableId::new(position, &file.name);
        Self {
            file,
            thumbnail,
            id,
        }
    }
}

/// Ordered list of arranged items.
///
/// Every transition returns the full file list in its new order, which is
/// what gets handed to the merge. Ids are never renumbered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arrangement {
    items: Vec<ArrangedItem>,
}

impl Arrangement {
    pub fn new(items: Vec<ArrangedItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ArrangedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &StableId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Files in their current order.
    pub fn files(&self) -> Vec<UploadFile> {
        self.items.iter().map(|item| item.file.clone()).collect()
    }

    /// Drop `dragged` onto `target`: the dragged item is taken out and
    /// reinserted at the target's index. Unknown ids or dropping an item on
    /// itself leave the order unchanged.
    pub fn move_by_drag(&mut self, dragged: &StableId, target: &StableId) -> Vec<UploadFile> {
        if dragged != target {
            if let (Some(from), Some(to)) = (self.position(dragged), self.position(target)) {
                let item = self.items.remove(from);
                self.items.insert(to, item);
                debug!(%dragged, %target, from, to, "item moved by drag");
            }
        }
        self.files()
    }

    /// Swap the item at `index` with the one before it. No-op at the top.
    pub fn move_up(&mut self, index: usize) -> Vec<UploadFile> {
        if index > 0 && index < self.items.len() {
            self.items.swap(index - 1, index);
        }
        self.files()
    }

    /// Swap the item at `index` with the one after it. No-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> Vec<UploadFile> {
        if index + 1 < self.items.len() {
            self.items.swap(index, index + 1);
        }
        self.files()
    }

    /// Remove the item with `id`, leaving other ids untouched.
    pub fn remove(&mut self, id: &StableId) -> Vec<UploadFile> {
        self.items.retain(|item| &item.id != id);
        self.files()
    }
}
