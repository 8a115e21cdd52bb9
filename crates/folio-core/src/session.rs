// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tool session: the lifecycle of one tool invocation, from file selection
// through processing to a downloadable result.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{FolioError, Result};
use crate::human_errors::{HumanError, humanize_error};
use crate::tools::ToolId;
use crate::types::{OperationResult, UploadBatch, UploadFile};
use crate::validate::FileValidator;

/// Progress shown while an operation is running never passes this value;
/// it only reaches 100 when the operation resolves.
pub const PROGRESS_CAP: f32 = 90.0;

/// Unique identifier for a tool session, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// Nothing selected yet.
    Idle,
    /// Files selected and validated; waiting for the user to start.
    Ready,
    /// Operation running. `progress` is cosmetic and says nothing about how
    /// far the operation has actually got.
    Processing { progress: f32 },
    /// Operation finished; the result is waiting to be downloaded.
    Complete,
    /// Operation failed.
    Failed(HumanError),
}

/// One tool invocation.
#[derive(Debug)]
pub struct ToolSession {
    id: SessionId,
    tool: ToolId,
    validator: FileValidator,
    batch: UploadBatch,
    validation_error: Option<String>,
    status: SessionStatus,
    result: Option<OperationResult>,
    started_at: Option<DateTime<Utc>>,
}

impl ToolSession {
    pub fn new(tool: ToolId, validator: FileValidator) -> Self {
        Self {
            id: SessionId::new(),
            tool,
            validator,
            batch: UploadBatch::new(),
            validation_error: None,
            status: SessionStatus::Idle,
            result: None,
            started_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn batch(&self) -> &UploadBatch {
        &self.batch
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// The message currently shown under the file picker, if any.
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn progress(&self) -> Option<f32> {
        match self.status {
            SessionStatus::Processing { progress } => Some(progress),
            SessionStatus::Complete => Some(100.0),
            _ => None,
        }
    }

    // -- Selection ------------------------------------------------------------

    /// Add (or replace, in single-select mode) files. Any previous validation
    /// message is cleared first; a rejected selection leaves the batch as it was.
    pub fn select(&mut self, incoming: Vec<UploadFile>) -> Result<&UploadBatch> {
        self.validation_error = None;

        match self.validator.validate(&self.batch, incoming) {
            Ok(batch) => {
                self.batch = batch;
                self.status = if self.batch.is_empty() {
                    SessionStatus::Idle
                } else {
                    SessionStatus::Ready
                };
                debug!(session = %self.id, files = self.batch.len(), "files selected");
                Ok(&self.batch)
            }
            Err(err) => {
                self.validation_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop one file from the selection.
    pub fn remove_file(&mut self, index: usize) {
        self.batch = self.batch.without(index);
        if self.batch.is_empty() {
            self.status = SessionStatus::Idle;
        }
    }

    /// Replace the batch order, e.g. after the user rearranged thumbnails.
    /// The new list must contain the same number of files.
    pub fn reorder(&mut self, files: Vec<UploadFile>) -> Result<()> {
        if files.len() != self.batch.len() {
            return Err(FolioError::InvalidInput(format!(
                "reordered list has {} files, expected {}",
                files.len(),
                self.batch.len()
            )));
        }
        self.batch = UploadBatch::from_files(files);
        Ok(())
    }

    // -- Processing -----------------------------------------------------------

    /// Move from `Ready` to `Processing`.
    pub fn begin(&mut self) -> Result<()> {
        if self.status != SessionStatus::Ready {
            return Err(FolioError::InvalidInput(
                "select files before processing".into(),
            ));
        }
        self.status = SessionStatus::Processing { progress: 0.0 };
        self.started_at = Some(Utc::now());
        info!(session = %self.id, tool = ?self.tool, files = self.batch.len(), "processing started");
        Ok(())
    }

    /// Nudge the displayed progress forward, never past [`PROGRESS_CAP`].
    pub fn advance(&mut self, step: f32) {
        if let SessionStatus::Processing { progress } = &mut self.status {
            *progress = (*progress + step.max(0.0)).min(PROGRESS_CAP);
        }
    }

    /// Record a successful result.
    pub fn complete(&mut self, result: OperationResult) {
        let elapsed_ms = self
            .started_at
            .map(|start| (Utc::now() - start).num_milliseconds())
            .unwrap_or_default();
        info!(session = %self.id, outputs = result.len(), elapsed_ms, "processing complete");
        self.result = Some(result);
        self.status = SessionStatus::Complete;
    }

    /// Record a failure. Returns what should be shown to the user.
    pub fn fail(&mut self, err: &FolioError) -> HumanError {
        warn!(session = %self.id, error = %err, "processing failed");
        let human = humanize_error(err);
        self.status = SessionStatus::Failed(human.clone());
        human
    }

    /// Hand the result over for download. The session keeps nothing.
    pub fn take_result(&mut self) -> Option<OperationResult> {
        self.result.take()
    }

    /// "Try Again" / "Start Over": forget files, result, and errors.
    pub fn reset(&mut self) {
        debug!(session = %self.id, "session reset");
        self.batch = UploadBatch::new();
        self.validation_error = None;
        self.status = SessionStatus::Idle;
        self.result = None;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::SelectMode;

    fn session(max_files: usize) -> ToolSession {
        ToolSession::new(
            ToolId::Merge,
            FileValidator {
                max_files,
                max_file_size: 1024,
                mode: SelectMode::Multiple,
            },
        )
    }

    fn pdf(name: &str) -> UploadFile {
        UploadFile::from_name(name, vec![0; 8])
    }

    #[test]
    fn selection_moves_to_ready() {
        let mut s = session(5);
        assert_eq!(s.status(), &SessionStatus::Idle);
        s.select(vec![pdf("a.pdf")]).unwrap();
        assert_eq!(s.status(), &SessionStatus::Ready);
    }

    #[test]
    fn new_selection_clears_previous_error() {
        let mut s = session(1);
        assert!(s.select(vec![pdf("a.pdf"), pdf("b.pdf")]).is_err());
        assert_eq!(s.validation_error(), Some("Maximum 1 files allowed"));
        assert!(s.batch().is_empty());

        s.select(vec![pdf("a.pdf")]).unwrap();
        assert_eq!(s.validation_error(), None);
    }

    #[test]
    fn progress_is_capped_until_complete() {
        let mut s = session(5);
        s.select(vec![pdf("a.pdf")]).unwrap();
        s.begin().unwrap();
        for _ in 0..10 {
            s.advance(30.0);
        }
        assert_eq!(s.progress(), Some(PROGRESS_CAP));

        s.complete(OperationResult::Document(vec![1]));
        assert_eq!(s.progress(), Some(100.0));
        assert_eq!(s.take_result(), Some(OperationResult::Document(vec![1])));
        assert_eq!(s.take_result(), None);
    }

    #[test]
    fn cannot_begin_without_files() {
        let mut s = session(5);
        assert!(s.begin().is_err());
    }

    #[test]
    fn failure_then_reset_returns_to_idle() {
        let mut s = session(5);
        s.select(vec![pdf("a.pdf")]).unwrap();
        s.begin().unwrap();
        let human = s.fail(&FolioError::PdfParse("bad header".into()));
        assert!(matches!(s.status(), SessionStatus::Failed(h) if h == &human));

        s.reset();
        assert_eq!(s.status(), &SessionStatus::Idle);
        assert!(s.batch().is_empty());
        assert_eq!(s.progress(), None);
    }

    #[test]
    fn removing_last_file_goes_idle() {
        let mut s = session(5);
        s.select(vec![pdf("a.pdf")]).unwrap();
        s.remove_file(0);
        assert_eq!(s.status(), &SessionStatus::Idle);
    }

    #[test]
    fn reorder_requires_same_count() {
        let mut s = session(5);
        s.select(vec![pdf("a.pdf"), pdf("b.pdf")]).unwrap();
        assert!(s.reorder(vec![pdf("b.pdf")]).is_err());
        s.reorder(vec![pdf("b.pdf"), pdf("a.pdf")]).unwrap();
        assert_eq!(s.batch().files()[0].name, "b.pdf");
    }
}
