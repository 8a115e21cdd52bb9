// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface: one subcommand per tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use folio_core::Rotation;
use folio_core::tools::Category;

#[derive(Debug, Parser)]
#[command(name = "folio", version)]
#[command(about = "Merge, split, reorder, rotate, stamp, and convert PDFs locally")]
pub struct Cli {
    /// Directory results are written to.
    #[arg(long, global = true, default_value = ".")]
    pub out_dir: PathBuf,

    /// JSON file overriding the default limits.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combine PDFs into one, in the order given (after any rearranging).
    Merge {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Rearrange before merging, applied in order: `drag:FROM:TO`,
        /// `up:N`, `down:N`, or `remove:N` (1-based positions).
        #[arg(long = "arrange", value_name = "MOVE", value_parser = parse_move)]
        moves: Vec<Move>,
    },
    /// One PDF per page.
    Split { file: PathBuf },
    /// Keep only the listed pages, in the listed order.
    Extract {
        file: PathBuf,
        /// Comma-separated page numbers, e.g. `1,3,5`.
        #[arg(long)]
        pages: String,
    },
    /// Delete the listed pages.
    Remove {
        file: PathBuf,
        #[arg(long)]
        pages: String,
    },
    /// Put pages in a new order; pages may repeat or be left out.
    Rearrange {
        file: PathBuf,
        /// New order, e.g. `3,1,2`.
        #[arg(long)]
        order: String,
    },
    /// Rotate every page clockwise.
    Rotate {
        file: PathBuf,
        /// 90, 180, or 270.
        #[arg(long, value_parser = parse_rotation)]
        degrees: Rotation,
    },
    /// Stamp diagonal text across every page.
    Watermark {
        file: PathBuf,
        #[arg(long)]
        text: String,
    },
    /// Number every page.
    PageNumbers { file: PathBuf },
    /// One page per PNG or JPEG image; other files are skipped.
    ImagesToPdf {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// One PNG per page.
    PdfToImages { file: PathBuf },
    /// Append the overlay's pages after the base document's pages.
    Overlay { base: PathBuf, overlay: PathBuf },
    /// Black out the top of every page.
    Redact { file: PathBuf },
    /// Create a PDF from text.
    Create {
        #[arg(long, default_value = "Document")]
        title: String,
        #[arg(long, conflicts_with = "text_file", required_unless_present = "text_file")]
        text: Option<String>,
        /// Read the text from a file instead.
        #[arg(long, value_name = "FILE")]
        text_file: Option<PathBuf>,
    },
    /// Drop unused objects and compress streams.
    Compress { file: PathBuf },
    /// Run a catalogue tool by slug (e.g. `sign-pdf`).
    Tool { slug: String, file: PathBuf },
    /// Print first-page thumbnails as JSON.
    Thumbnails {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print page count, size, and SHA-256 as JSON.
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the tool catalogue.
    Tools {
        /// Only tools whose name or description contains this text.
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
    },
}

/// One rearrangement step, with 1-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Drag { from: usize, to: usize },
    Up(usize),
    Down(usize),
    Remove(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Organize,
    Edit,
    Convert,
    Optimize,
    Security,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Organize => Category::Organize,
            CategoryArg::Edit => Category::Edit,
            CategoryArg::Convert => Category::Convert,
            CategoryArg::Optimize => Category::Optimize,
            CategoryArg::Security => Category::Security,
        }
    }
}

fn position(text: &str) -> Result<usize, String> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("`{text}` is not a position (1, 2, 3, ...)")),
    }
}

pub fn parse_move(spec: &str) -> Result<Move, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    match parts.as_slice() {
        ["drag", from, to] => Ok(Move::Drag {
            from: position(from)?,
            to: position(to)?,
        }),
        ["up", n] => Ok(Move::Up(position(n)?)),
        ["down", n] => Ok(Move::Down(position(n)?)),
        ["remove", n] => Ok(Move::Remove(position(n)?)),
        _ => Err(format!(
            "`{spec}` is not a move; use drag:FROM:TO, up:N, down:N, or remove:N"
        )),
    }
}

pub fn parse_rotation(text: &str) -> Result<Rotation, String> {
    let degrees: i64 = text
        .trim()
        .parse()
        .map_err(|_| format!("`{text}` is not a number of degrees"))?;
    Rotation::try_from(degrees).map_err(|err| err.to_string())
}
