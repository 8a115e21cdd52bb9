// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool registry: the fixed catalogue of tools, their display metadata, and
// icon resolution.

use serde::Serialize;

/// Every tool the suite offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    Merge,
    Split,
    Compress,
    ImagesToPdf,
    PdfToImages,
    ExtractPages,
    RotatePages,
    AddPageNumbers,
    EditPdf,
    SignPdf,
    PdfConverter,
    ExtractImages,
    ProtectPdf,
    UnlockPdf,
    RemovePages,
    RearrangePages,
    WebpageToPdf,
    PdfOcr,
    AddWatermark,
    PdfOverlay,
    ComparePdfs,
    WebOptimize,
    RedactPdf,
    CreatePdf,
}

/// Grouping used to filter the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Organize,
    Edit,
    Convert,
    Optimize,
    Security,
}

/// Icons available to tool cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Icon {
    Merge,
    Scissors,
    Zap,
    Image,
    FileImage,
    FileText,
    RotateCw,
    Hash,
    Edit,
    Shield,
    Lock,
    Unlock,
    Trash2,
    Layers,
    Layers2,
    Globe,
    Search,
    Droplet,
    BarChart3,
    Maximize,
    Eye,
    Plus,
}

const ICONS: &[(&str, Icon)] = &[
    ("Merge", Icon::Merge),
    ("Scissors", Icon::Scissors),
    ("Zap", Icon::Zap),
    ("Image", Icon::Image),
    ("FileImage", Icon::FileImage),
    ("FileText", Icon::FileText),
    ("RotateCw", Icon::RotateCw),
    ("Hash", Icon::Hash),
    ("Edit", Icon::Edit),
    ("Shield", Icon::Shield),
    ("Lock", Icon::Lock),
    ("Unlock", Icon::Unlock),
    ("Trash2", Icon::Trash2),
    ("Layers", Icon::Layers),
    ("Layers2", Icon::Layers2),
    ("Globe", Icon::Globe),
    ("Search", Icon::Search),
    ("Droplet", Icon::Droplet),
    ("BarChart3", Icon::BarChart3),
    ("Maximize", Icon::Maximize),
    ("Eye", Icon::Eye),
    ("Plus", Icon::Plus),
];

impl Icon {
    /// Resolve an icon by its key. Unknown keys fall back to `FileText`.
    pub fn from_key(key: &str) -> Self {
        ICONS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, icon)| *icon)
            .unwrap_or(Icon::FileText)
    }

    pub fn key(&self) -> &'static str {
        ICONS
            .iter()
            .find(|(_, icon)| icon == self)
            .map(|(name, _)| *name)
            .unwrap_or("FileText")
    }
}

/// Display metadata for one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub name: &'static str,
    pub slug: &'static str,
    pub short_description: &'static str,
    pub category: Category,
    pub icon: &'static str,
    /// `false` for tools that hand their input back unchanged.
    pub implemented: bool,
    /// Base name for the downloaded result.
    pub output_name: &'static str,
}

macro_rules! tool {
    ($id:ident, $name:expr, $slug:expr, $desc:expr, $cat:ident, $icon:expr, $implemented:expr, $out:expr) => {
        ToolDescriptor {
            id: ToolId::$id,
            name: $name,
            slug: $slug,
            short_description: $desc,
            category: Category::$cat,
            icon: $icon,
            implemented: $implemented,
            output_name: $out,
        }
    };
}

static TOOLS: &[ToolDescriptor] = &[
    tool!(Merge, "Merge PDF", "merge-pdf", "Combine multiple PDFs into one document", Organize, "Merge", true, "merged"),
    tool!(Split, "Split PDF", "split-pdf", "Divide a PDF into separate files, one page per file", Organize, "Scissors", true, "split"),
    tool!(Compress, "Compress PDF", "compress-pdf", "Reduce PDF file size while maintaining quality", Optimize, "Zap", true, "compressed"),
    tool!(ImagesToPdf, "Images to PDF", "images-to-pdf", "Convert JPG and PNG images into a PDF document", Convert, "Image", true, "images"),
    tool!(PdfToImages, "PDF to Images", "pdf-to-images", "Convert PDF pages into individual image files", Convert, "FileImage", true, "page"),
    tool!(ExtractPages, "Extract Pages", "extract-pages", "Select and extract specific pages from a PDF", Organize, "FileText", true, "extracted"),
    tool!(RotatePages, "Rotate Pages", "rotate-pages", "Rotate PDF pages 90, 180, or 270 degrees", Organize, "RotateCw", true, "rotated"),
    tool!(AddPageNumbers, "Add Page Numbers", "add-page-numbers", "Automatically add page numbers to your PDF document", Edit, "Hash", true, "numbered"),
    tool!(EditPdf, "Edit PDF", "edit-pdf", "Edit text and content in PDF documents", Edit, "Edit", false, "edited"),
    tool!(SignPdf, "Sign PDF", "sign-pdf", "Add digital signatures to PDF documents", Security, "Shield", false, "signed"),
    tool!(PdfConverter, "PDF Converter", "pdf-converter", "Convert documents to PDF format", Convert, "FileText", false, "converted"),
    tool!(ExtractImages, "Extract Images", "extract-images", "Extract images from PDF documents", Convert, "Image", false, "extracted-images"),
    tool!(ProtectPdf, "Protect PDF", "protect-pdf", "Add password protection to PDFs", Security, "Lock", false, "protected"),
    tool!(UnlockPdf, "Unlock PDF", "unlock-pdf", "Remove password protection from PDFs", Security, "Unlock", false, "unlocked"),
    tool!(RemovePages, "Remove Pages", "remove-pages", "Delete specific pages from a PDF", Organize, "Trash2", true, "removed"),
    tool!(RearrangePages, "Rearrange Pages", "rearrange-pages", "Reorder pages in your PDF document", Organize, "Layers", true, "rearranged"),
    tool!(WebpageToPdf, "Webpage to PDF", "webpage-to-pdf", "Convert webpages to PDF documents", Convert, "Globe", false, "webpage"),
    tool!(PdfOcr, "PDF OCR", "pdf-ocr", "Extract text from scanned PDFs", Convert, "Search", false, "ocr"),
    tool!(AddWatermark, "Add Watermark", "add-watermark", "Add text watermarks to PDF pages", Edit, "Droplet", true, "watermarked"),
    tool!(PdfOverlay, "PDF Overlay", "pdf-overlay", "Combine a base PDF with an overlay PDF", Edit, "Layers2", true, "overlay"),
    tool!(ComparePdfs, "Compare PDFs", "compare-pdfs", "Find differences between PDF documents", Edit, "BarChart3", false, "comparison"),
    tool!(WebOptimize, "Web Optimize", "web-optimize", "Optimize PDFs for web viewing", Optimize, "Maximize", false, "optimized"),
    tool!(RedactPdf, "Redact PDF", "redact-pdf", "Cover sensitive information in PDFs", Security, "Eye", true, "redacted"),
    tool!(CreatePdf, "Create PDF", "create-pdf", "Create a new PDF from text", Convert, "Plus", true, "document"),
];

impl ToolId {
    pub fn descriptor(&self) -> &'static ToolDescriptor {
        TOOLS
            .iter()
            .find(|tool| tool.id == *self)
            .unwrap_or(&TOOLS[0])
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        TOOLS.iter().find(|tool| tool.slug == slug).map(|tool| tool.id)
    }

    pub fn icon(&self) -> Icon {
        Icon::from_key(self.descriptor().icon)
    }
}

/// The whole catalogue, in display order.
pub fn all_tools() -> &'static [ToolDescriptor] {
    TOOLS
}

/// Tools whose name or description contains `query` (case-insensitive),
/// optionally restricted to one category.
pub fn search_tools(query: &str, category: Option<Category>) -> Vec<&'static ToolDescriptor> {
    let needle = query.to_lowercase();
    TOOLS
        .iter()
        .filter(|tool| {
            tool.name.to_lowercase().contains(&needle)
                || tool.short_description.to_lowercase().contains(&needle)
        })
        .filter(|tool| category.is_none_or(|c| tool.category == c))
        .collect()
}
