// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload gate: enforces file count and per-file size limits on a selection.

use tracing::{debug, warn};

use crate::config::ToolConfig;
use crate::error::{FolioError, Result};
use crate::types::{UploadBatch, UploadFile};

/// How a new selection combines with the files already chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Append the new files to the existing batch.
    Multiple,
    /// The new files replace the existing batch.
    Single,
}

/// Checks a file selection against the configured limits.
#[derive(Debug, Clone)]
pub struct FileValidator {
    pub max_files: usize,
    pub max_file_size: u64,
    pub mode: SelectMode,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::from_config(&ToolConfig::default(), SelectMode::Multiple)
    }
}

impl FileValidator {
    pub fn from_config(config: &ToolConfig, mode: SelectMode) -> Self {
        Self {
            max_files: config.max_files,
            max_file_size: config.max_file_size,
            mode,
        }
    }

    /// Validate `incoming` against the limits, given what is already selected.
    ///
    /// The count limit covers the existing files plus the new ones, in both
    /// modes. On success the returned batch replaces the existing one.
    pub fn validate(&self, existing: &UploadBatch, incoming: Vec<UploadFile>) -> Result<UploadBatch> {
        if existing.len() + incoming.len() > self.max_files {
            warn!(
                existing = existing.len(),
                incoming = incoming.len(),
                max = self.max_files,
                "selection exceeds file count limit"
            );
            return Err(FolioError::TooManyFiles {
                max: self.max_files,
            });
        }

        if let Some(oversized) = incoming.iter().find(|f| f.size() > self.max_file_size) {
            warn!(name = %oversized.name, size = oversized.size(), "file exceeds size limit");
            return Err(FolioError::FileTooLarge {
                name: oversized.name.clone(),
                limit: format_file_size(self.max_file_size),
            });
        }

        let files = match self.mode {
            SelectMode::Multiple => {
                let mut files = existing.files().to_vec();
                files.extend(incoming);
                files
            }
            SelectMode::Single => incoming,
        };

        debug!(count = files.len(), "selection accepted");
        Ok(UploadBatch::from_files(files))
    }
}

/// Format a byte count for display: base-1024 units, at most two decimals.
///
/// `0` renders as `"0 Bytes"`; `101 * 1024 * 1024` as `"101 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
