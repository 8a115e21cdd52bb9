// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Validation errors are shown as-is next to the input that caused them.
// Everything else becomes a short heading plus a "Try Again" suggestion;
// nothing is retried automatically.

use crate::error::{ErrorKind, FolioError};

/// A failure as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should do next.
    pub suggestion: String,
    pub kind: ErrorKind,
}

pub const TRY_AGAIN: &str = "Try Again";

/// Convert a `FolioError` into what the user sees.
pub fn humanize_error(err: &FolioError) -> HumanError {
    let kind = err.kind();
    match kind {
        ErrorKind::Validation => HumanError {
            message: err.to_string(),
            suggestion: validation_hint(err).into(),
            kind,
        },
        ErrorKind::Parse => HumanError {
            message: err.to_string(),
            suggestion: format!("{TRY_AGAIN}: choose a different PDF file."),
            kind,
        },
        ErrorKind::Operation => HumanError {
            message: "Something went wrong while processing your file.".into(),
            suggestion: format!("{TRY_AGAIN}. ({err})"),
            kind,
        },
    }
}

fn validation_hint(err: &FolioError) -> &'static str {
    match err {
        FolioError::TooManyFiles { .. } => "Remove some files and select again.",
        FolioError::FileTooLarge { .. } => "Choose a smaller file.",
        FolioError::MissingPageSpec(_) | FolioError::NoValidPages => {
            "Enter page numbers separated by commas (e.g., 2,4,6)."
        }
        FolioError::InvalidRotation(_) => "Choose 90, 180, or 270 degrees.",
        _ => "Check your selection and try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let human = humanize_error(&FolioError::NoValidPages);
        assert_eq!(human.message, "No valid page numbers entered");
        assert_eq!(human.kind, ErrorKind::Validation);
        assert!(human.suggestion.contains("2,4,6"));
    }

    #[test]
    fn parse_error_surfaces_detail() {
        let err = FolioError::PdfParse("invalid file header".into());
        let human = humanize_error(&err);
        assert!(human.message.contains("invalid file header"));
        assert!(human.suggestion.starts_with(TRY_AGAIN));
    }

    #[test]
    fn operation_error_offers_reset() {
        let err = FolioError::PdfError("no catalog".into());
        let human = humanize_error(&err);
        assert_eq!(human.kind, ErrorKind::Operation);
        assert!(human.suggestion.starts_with(TRY_AGAIN));
        assert!(human.suggestion.contains("no catalog"));
    }
}
