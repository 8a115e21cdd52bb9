// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Limits and fixed parameters shared by every tool.
///
/// Read from an optional JSON file; fields left out of the file keep their
/// defaults. Nothing is ever written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Maximum number of files in one batch.
    pub max_files: usize,
    /// Maximum size of a single file, in bytes.
    pub max_file_size: u64,
    /// Zoom factor for first-page thumbnails in the arrangement view.
    pub thumbnail_scale: f32,
    /// Zoom factor for PDF → image export.
    pub export_scale: f32,
    /// Page size for documents created from text.
    pub text_paper_size: crate::PaperSize,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            max_files: 50,
            max_file_size: 100 * 1024 * 1024,
            thumbnail_scale: 1.5,
            export_scale: 2.0,
            text_paper_size: crate::PaperSize::Letter,
        }
    }
}

impl ToolConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), ?config, "configuration loaded");
        Ok(config)
    }
}
