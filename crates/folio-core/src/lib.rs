// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio: Core types, validation, and page-selection logic shared across all crates.

pub mod arrange;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod pages;
pub mod session;
pub mod tools;
pub mod types;
pub mod validate;

pub use arrange::{ArrangedItem, Arrangement, StableId};
pub use config::ToolConfig;
pub use error::FolioError;
pub use pages::{PageIntent, PageSelection, resolve_pages};
pub use session::{SessionStatus, ToolSession};
pub use tools::ToolId;
pub use types::*;
pub use validate::{FileValidator, SelectMode, format_file_size};
