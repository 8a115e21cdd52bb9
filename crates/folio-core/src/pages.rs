// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page selection: turns free-text page lists ("2, 4,6") into validated,
// zero-based page indices.

use tracing::debug;

use crate::error::{FolioError, Result};

/// What a page list is going to be used for. Only affects the message shown
/// when the input is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIntent {
    Extract,
    Remove,
    Rearrange,
}

impl PageIntent {
    fn missing_message(self) -> &'static str {
        match self {
            Self::Extract => "Please enter page numbers to extract",
            Self::Remove => "Please enter page numbers to remove",
            Self::Rearrange => "Please enter the new page order",
        }
    }
}

/// Zero-based page indices, each within `[0, page_count)`.
///
/// Order is the order the user typed and duplicates are kept; both matter
/// for rearranging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<usize>,
    page_count: usize,
}

impl PageSelection {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices in strictly descending order, each at most once.
    ///
    /// Pages must be removed one at a time in this order: removing a page
    /// shifts every later page down by one, so only higher-to-lower removal
    /// keeps the remaining original indices valid.
    pub fn removal_order(&self) -> Vec<usize> {
        let mut order = self.indices.clone();
        order.sort_unstable_by(|a, b| b.cmp(a));
        order.dedup();
        order
    }
}

/// Resolve a comma-separated list of 1-based page numbers against a document
/// with `page_count` pages.
///
/// Blank input is rejected with an intent-specific message before parsing.
/// Tokens that do not parse, are `<= 0`, or exceed `page_count` are dropped
/// silently; the only other error is when nothing survives.
pub fn resolve_pages(input: &str, page_count: usize, intent: PageIntent) -> Result<PageSelection> {
    if input.trim().is_empty() {
        return Err(FolioError::MissingPageSpec(intent.missing_message().to_string()));
    }

    let indices: Vec<usize> = input
        .split(',')
        .filter_map(|token| parse_leading_int(token.trim()))
        .filter(|&n| n > 0 && (n as u64) <= page_count as u64)
        .map(|n| n as usize - 1)
        .collect();

    debug!(input, page_count, resolved = indices.len(), "page list resolved");

    if indices.is_empty() {
        return Err(FolioError::NoValidPages);
    }

    Ok(PageSelection {
        indices,
        page_count,
    })
}

/// Parse the leading integer of a token, ignoring anything after the digits
/// ("3rd" → 3, "2.5" → 2). Returns `None` when there are no leading digits.
fn parse_leading_int(token: &str) -> Option<i64> {
    let (negative, rest) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    let digits_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    // Overlong digit runs are far beyond any page count; treat as unparseable.
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
