//! Client-held state shared by the session controllers.

use crate::backend::{HistoryTurn, Role, SourceRef};

/// Result count requested from every retrieval call.
pub const TOP_K: usize = 5;

/// Number of prior chat turns transmitted with a question.
pub const HISTORY_WINDOW: usize = 6;

/// Number of upload records shown in the recent-uploads list.
pub const RECENT_UPLOADS: usize = 5;

/// One entry of the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    /// Speaker of the turn.
    pub role: Role,
    /// Text shown for the turn.
    pub content: String,
    /// Ordered citations, only present on answers.
    pub sources: Option<Vec<SourceRef>>,
    /// Marks assistant turns that describe a failed request.
    pub is_error: bool,
}

impl ChatTurn {
    /// Question typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            is_error: false,
        }
    }

    /// Successful answer with optional citations.
    pub fn answer(content: impl Into<String>, sources: Option<Vec<SourceRef>>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            is_error: false,
        }
    }

    /// Assistant turn recording a failed request.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: None,
            is_error: true,
        }
    }
}

impl From<&ChatTurn> for HistoryTurn {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Phase of the file currently being processed by the upload orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatusKind {
    /// Request in flight.
    Loading,
    /// Service ingested the file.
    Success,
    /// Transport or service failure.
    Error,
}

/// Single-slot banner describing the most recently attempted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    /// Phase of the attempt.
    pub kind: UploadStatusKind,
    /// Human-readable banner text.
    pub message: String,
}

impl UploadStatus {
    pub(crate) fn loading(filename: &str) -> Self {
        Self {
            kind: UploadStatusKind::Loading,
            message: format!("Uploading {filename}..."),
        }
    }

    pub(crate) fn success(filename: &str, chunks_created: u64) -> Self {
        Self {
            kind: UploadStatusKind::Success,
            message: format!("✓ {filename} processed into {chunks_created} chunks"),
        }
    }

    pub(crate) fn error(message: String) -> Self {
        Self {
            kind: UploadStatusKind::Error,
            message,
        }
    }
}
