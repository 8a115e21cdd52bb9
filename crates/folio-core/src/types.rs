// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: uploaded files, batches, paper sizes, and operation results.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::FolioError;

/// Document types the toolkit distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Png,
    Jpeg,
    /// Anything else; carried through but never embedded or parsed.
    Other,
}

impl DocumentType {
    /// Canonical MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Other => "application/octet-stream",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            _ => Self::Other,
        }
    }

    /// Classify a MIME type string. `image/jpg` is accepted as an alias
    /// because some pickers report it.
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            "application/pdf" => Self::Pdf,
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            _ => Self::Other,
        }
    }

    /// Whether images of this type can be embedded into a PDF page.
    pub fn is_embeddable_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

/// A single user-selected file: name, reported MIME type, and contents.
///
/// Contents are reference-counted so that arrangement and batch operations
/// can move handles around without copying document bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    data: Arc<[u8]>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: Arc::from(data),
        }
    }

    /// Build a file whose MIME type is inferred from the name's extension.
    pub fn from_name(name: impl Into<String>, data: Vec<u8>) -> Self {
        let name = name.into();
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let mime = DocumentType::from_extension(ext).mime_type();
        Self::new(name, mime, data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn document_type(&self) -> DocumentType {
        DocumentType::from_mime(&self.mime_type)
    }
}

/// The current ordered selection of files for one tool invocation.
///
/// Only [`crate::validate::FileValidator`] produces non-empty batches, so a
/// batch always satisfies the configured count and size limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    files: Vec<UploadFile>,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_files(files: Vec<UploadFile>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<UploadFile> {
        self.files
    }

    /// Drop the file at `index`, returning the replacement batch.
    pub fn without(&self, index: usize) -> Self {
        let files = self
            .files
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, f)| f.clone())
            .collect();
        Self { files }
    }
}

/// Standard paper sizes used when generating new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    Letter,
    A4,
    Legal,
}

impl PaperSize {
    /// Dimensions in PDF points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.0, 842.0),
            Self::Legal => (612.0, 1008.0),
        }
    }
}

/// Clockwise rotation applied uniformly to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn degrees(&self) -> i64 {
        match self {
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarter => 270,
        }
    }

    /// Rotation after applying `self` on top of an existing `/Rotate` value.
    /// Existing values are normalised into `0..360` first.
    pub fn apply_to(&self, current: i64) -> i64 {
        (current + self.degrees()).rem_euclid(360)
    }
}

impl TryFrom<i64> for Rotation {
    type Error = FolioError;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        match degrees {
            90 => Ok(Self::Quarter),
            180 => Ok(Self::Half),
            270 => Ok(Self::ThreeQuarter),
            other => Err(FolioError::InvalidRotation(other)),
        }
    }
}

/// Output of a document operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// A single output document.
    Document(Vec<u8>),
    /// Several output documents, in order (e.g. one per page after a split).
    Documents(Vec<Vec<u8>>),
    /// Encoded PNG images, one per page.
    Images(Vec<Vec<u8>>),
}

impl OperationResult {
    /// All output buffers in order.
    pub fn buffers(&self) -> Vec<&[u8]> {
        match self {
            Self::Document(bytes) => vec![bytes.as_slice()],
            Self::Documents(list) | Self::Images(list) => {
                list.iter().map(Vec::as_slice).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Document(_) => 1,
            Self::Documents(list) | Self::Images(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File extension for the buffers held by this result.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Document(_) | Self::Documents(_) => "pdf",
            Self::Images(_) => "png",
        }
    }

    /// Download names for each buffer.
    ///
    /// A single document is named `{base}.pdf`; multiple buffers are numbered
    /// `{base}-{n}.{ext}` starting at 1.
    pub fn file_names(&self, base: &str) -> Vec<String> {
        let ext = self.extension();
        match self {
            Self::Document(_) => vec![format!("{base}.{ext}")],
            Self::Documents(_) | Self::Images(_) => numbered_names(base, self.len(), ext),
        }
    }
}

/// `{base}-1.{ext}`, `{base}-2.{ext}`, ...
pub fn numbered_names(base: &str, count: usize, ext: &str) -> Vec<String> {
    (0..count).map(|i| format!("{base}-{}.{ext}", i + 1)).collect()
}
