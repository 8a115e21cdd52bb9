// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Writing operation results to the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_core::OperationResult;
use tracing::info;

/// Write every buffer of `result` into `dir`, one after another.
///
/// A single document becomes `{base}.pdf`; several buffers become
/// `{base}-1.{ext}`, `{base}-2.{ext}`, ...
pub async fn write_result(dir: &Path, base: &str, result: &OperationResult) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(result.len());
    for (name, bytes) in result.file_names(base).into_iter().zip(result.buffers()) {
        let path = dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "result written");
        written.push(path);
    }
    Ok(written)
}
