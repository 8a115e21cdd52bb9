// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document info: page count, human-readable size, and content digest.

use folio_core::error::Result;
use folio_core::{UploadFile, format_file_size};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::pdf::page_tree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub file_name: String,
    pub page_count: usize,
    /// Size for display, e.g. `1.5 MB`.
    pub file_size: String,
    pub size_bytes: u64,
    /// Lower-case hex SHA-256 of the file bytes.
    pub sha256: String,
}

impl DocumentInfo {
    #[instrument(skip_all, fields(name = %file.name))]
    pub fn inspect(file: &UploadFile) -> Result<Self> {
        let doc = page_tree::load(file.data())?;
        Ok(Self {
            file_name: file.name.clone(),
            page_count: doc.get_pages().len(),
            file_size: format_file_size(file.size()),
            size_bytes: file.size(),
            sha256: hex::encode(Sha256::digest(file.data())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::numbered_pdf;

    #[test]
    fn reports_pages_and_digest() {
        let file = UploadFile::new("doc.pdf", "application/pdf", numbered_pdf("p", 4));
        let info = DocumentInfo::inspect(&file).unwrap();
        assert_eq!(info.page_count, 4);
        assert_eq!(info.file_name, "doc.pdf");
        assert_eq!(info.sha256.len(), 64);
        assert_eq!(info.size_bytes, file.size());
    }

    #[test]
    fn rejects_non_pdf() {
        let file = UploadFile::new("x.pdf", "application/pdf", b"hello".to_vec());
        assert!(DocumentInfo::inspect(&file).is_err());
    }
}
