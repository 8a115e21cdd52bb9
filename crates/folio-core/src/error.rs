// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Validation errors (raised before any operation runs) --
    #[error("Maximum {max} files allowed")]
    TooManyFiles { max: usize },

    #[error("File \"{name}\" exceeds maximum size of {limit}")]
    FileTooLarge { name: String, limit: String },

    #[error("{0}")]
    MissingPageSpec(String),

    #[error("No valid page numbers entered")]
    NoValidPages,

    #[error("rotation must be 90, 180, or 270 degrees, got {0}")]
    InvalidRotation(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Document errors --
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Broad error classes, used to decide how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before the operation ran; shown inline next to the input.
    Validation,
    /// The input document could not be loaded.
    Parse,
    /// The operation itself failed.
    Operation,
}

impl FolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyFiles { .. }
            | Self::FileTooLarge { .. }
            | Self::MissingPageSpec(_)
            | Self::NoValidPages
            | Self::InvalidRotation(_)
            | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::PdfParse(_) => ErrorKind::Parse,
            Self::PdfError(_)
            | Self::ImageError(_)
            | Self::Render(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorKind::Operation,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;
