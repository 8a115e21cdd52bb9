// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading selected files from disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_core::UploadFile;
use tracing::debug;

/// Read each path into an [`UploadFile`], typed by its extension.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(path).await?);
    }
    Ok(files)
}

pub async fn load_file(path: &Path) -> Result<UploadFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let file = UploadFile::from_name(name, data);
    debug!(name = %file.name, mime = %file.mime_type, size = file.size(), "file loaded");
    Ok(file)
}
